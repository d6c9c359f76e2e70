//! Consent gate
//!
//! Every consent is tracked independently. Redacted data may only leave
//! the machine once all of them are given.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consent {
    Voluntary,
    ResearchUse,
    Deletion,
    Independent,
}

impl Consent {
    pub const ALL: [Consent; 4] = [
        Consent::Voluntary,
        Consent::ResearchUse,
        Consent::Deletion,
        Consent::Independent,
    ];

    /// Name used on the command line
    pub fn flag(&self) -> &'static str {
        match self {
            Consent::Voluntary => "voluntary",
            Consent::ResearchUse => "research-use",
            Consent::Deletion => "deletion",
            Consent::Independent => "independent",
        }
    }

    /// Statement the donor agrees to
    pub fn statement(&self) -> &'static str {
        match self {
            Consent::Voluntary => "I voluntarily donate my anonymized data for research purposes.",
            Consent::ResearchUse => "I agree to research use of my anonymized data.",
            Consent::Deletion => "I understand that I can request the deletion of my data at any time.",
            Consent::Independent => {
                "I understand that this is independent from my coursework and completely voluntary; there is no grade impact."
            }
        }
    }
}

impl FromStr for Consent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Consent::ALL
            .into_iter()
            .find(|c| c.flag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("unknown consent: {}", s)))
    }
}

/// Checkbox state for each consent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsentSet {
    given: BTreeSet<Consent>,
}

impl ConsentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Consent::ALL.into_iter().collect()
    }

    pub fn give(&mut self, consent: Consent) {
        self.given.insert(consent);
    }

    pub fn withdraw(&mut self, consent: Consent) {
        self.given.remove(&consent);
    }

    pub fn is_given(&self, consent: Consent) -> bool {
        self.given.contains(&consent)
    }

    pub fn missing(&self) -> Vec<Consent> {
        Consent::ALL
            .into_iter()
            .filter(|c| !self.given.contains(c))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Fail with the list of consents that are still unchecked
    pub fn require_all(&self) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::ConsentMissing(missing))
        }
    }
}

impl FromIterator<Consent> for ConsentSet {
    fn from_iter<I: IntoIterator<Item = Consent>>(iter: I) -> Self {
        Self {
            given: iter.into_iter().collect(),
        }
    }
}
