//! Sensitive-key set and related policies

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of sanitized key names whose values get redacted wholesale.
///
/// Membership is an exact, case-sensitive string match against the
/// sanitized form of each object key. The set is ordered so it prints
/// deterministically for review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensitiveKeys {
    keys: BTreeSet<String>,
}

impl SensitiveKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of the common set, the platform set and user-selected extras
    pub fn assemble<C, P, E>(common: C, platform: P, extras: E) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let mut keys = Self::new();
        keys.extend(common);
        keys.extend(platform);
        keys.extend(extras);
        keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn union(&self, other: &SensitiveKeys) -> SensitiveKeys {
        Self {
            keys: self.keys.union(&other.keys).cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> Extend<S> for SensitiveKeys {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.keys.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for SensitiveKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut keys = Self::new();
        keys.extend(iter);
        keys
    }
}

/// Containers nested deeper than this are rejected, both when parsing an
/// upload and when walking a document
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What to do when two raw keys of one object sanitize to the same key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Keep the value of the later key in document order, at the position
    /// of the first occurrence
    #[default]
    LastWins,
    /// Fail with `Error::KeyCollision`
    Reject,
}
