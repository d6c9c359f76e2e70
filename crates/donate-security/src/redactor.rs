use donate_core::{CollisionPolicy, Error, Result, SensitiveKeys};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use crate::KeyRules;

/// Replacement written in place of every redacted value
pub const REDACTED: &str = "REDACTED";

pub use donate_core::DEFAULT_MAX_DEPTH;

/// What an anonymization pass replaced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionReport {
    /// Number of replaced values per sanitized key
    pub redacted: BTreeMap<String, usize>,
    /// Sanitized keys that more than one raw key folded into
    pub collisions: Vec<String>,
}

impl RedactionReport {
    pub fn total(&self) -> usize {
        self.redacted.values().sum()
    }

    fn record(&mut self, key: &str) {
        *self.redacted.entry(key.to_string()).or_insert(0) += 1;
    }

    fn merge_counts(&mut self, other: RedactionReport) {
        for (key, count) in other.redacted {
            *self.redacted.entry(key).or_insert(0) += count;
        }
    }
}

/// Key-driven redaction of JSON documents.
///
/// Redaction happens at object-key granularity only: a value whose
/// sanitized key is sensitive is replaced by [`REDACTED`] without being
/// inspected. Arrays and scalars are never redacted on their own.
/// Every call builds a fresh output; the input is never mutated.
#[derive(Debug, Clone)]
pub struct Redactor {
    rules: KeyRules,
    max_depth: usize,
    collisions: CollisionPolicy,
}

impl Redactor {
    pub fn new() -> Self {
        Self::with_rules(KeyRules::builtin())
    }

    pub fn with_rules(rules: KeyRules) -> Self {
        Self {
            rules,
            max_depth: DEFAULT_MAX_DEPTH,
            collisions: CollisionPolicy::default(),
        }
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collisions = policy;
        self
    }

    pub fn rules(&self) -> &KeyRules {
        &self.rules
    }

    pub fn sanitize_key<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        self.rules.sanitize(raw)
    }

    /// Every sanitized key in the document, minus purely numeric ones
    pub fn extract_keys(&self, value: &Value) -> Result<BTreeSet<String>> {
        let mut keys = BTreeSet::new();
        self.collect_keys(value, 0, &mut keys)?;
        Ok(keys)
    }

    fn collect_keys(&self, value: &Value, depth: usize, keys: &mut BTreeSet<String>) -> Result<()> {
        match value {
            Value::Object(map) => {
                self.check_depth(depth)?;
                for (raw, child) in map {
                    let key = self.sanitize_key(raw);
                    if !is_numeric(&key) {
                        keys.insert(key.into_owned());
                    }
                    // Numeric keys are index-like; their children still count
                    self.collect_keys(child, depth + 1, keys)?;
                }
            }
            Value::Array(items) => {
                self.check_depth(depth)?;
                for item in items {
                    self.collect_keys(item, depth + 1, keys)?;
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
        Ok(())
    }

    /// Redacted copy of `value`
    pub fn anonymize(&self, value: &Value, sensitive: &SensitiveKeys) -> Result<Value> {
        self.anonymize_with_report(value, sensitive)
            .map(|(value, _)| value)
    }

    pub fn anonymize_with_report(
        &self,
        value: &Value,
        sensitive: &SensitiveKeys,
    ) -> Result<(Value, RedactionReport)> {
        let mut report = RedactionReport::default();
        let redacted = self.redact_value(value, sensitive, 0, &mut report)?;

        tracing::debug!(
            redacted = report.total(),
            collisions = report.collisions.len(),
            "anonymized document"
        );

        Ok((redacted, report))
    }

    /// Anonymize anything that serializes to JSON.
    ///
    /// Values with no JSON representation (non-string map keys, for
    /// example) are rejected with `Error::InvalidInput`.
    pub fn anonymize_serializable<T: Serialize + ?Sized>(
        &self,
        value: &T,
        sensitive: &SensitiveKeys,
    ) -> Result<Value> {
        let value = serde_json::to_value(value).map_err(|e| Error::InvalidInput(e.to_string()))?;
        self.anonymize(&value, sensitive)
    }

    fn redact_value(
        &self,
        value: &Value,
        sensitive: &SensitiveKeys,
        depth: usize,
        report: &mut RedactionReport,
    ) -> Result<Value> {
        match value {
            Value::Object(map) => {
                self.check_depth(depth)?;
                let mut out = Map::with_capacity(map.len());
                // Counts per output key, so an overwritten value is not reported
                let mut counts: BTreeMap<String, RedactionReport> = BTreeMap::new();
                for (raw, child) in map {
                    let key = self.sanitize_key(raw);

                    if out.contains_key(&*key) {
                        match self.collisions {
                            CollisionPolicy::Reject => {
                                return Err(Error::KeyCollision {
                                    key: key.into_owned(),
                                });
                            }
                            CollisionPolicy::LastWins => {
                                tracing::warn!(key = %key, raw = %raw, "sanitized key collision, keeping later value");
                                report.collisions.push(key.to_string());
                            }
                        }
                    }

                    let mut child_report = RedactionReport::default();
                    let replacement = if sensitive.contains(&key) {
                        child_report.record(&key);
                        Value::String(REDACTED.to_string())
                    } else {
                        self.redact_value(child, sensitive, depth + 1, &mut child_report)?
                    };

                    report.collisions.append(&mut child_report.collisions);
                    counts.insert(key.to_string(), child_report);
                    out.insert(key.into_owned(), replacement);
                }
                for child_report in counts.into_values() {
                    report.merge_counts(child_report);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => {
                self.check_depth(depth)?;
                items
                    .iter()
                    .map(|item| self.redact_value(item, sensitive, depth + 1, report))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(value.clone()),
        }
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth >= self.max_depth {
            Err(Error::DepthLimitExceeded {
                limit: self.max_depth,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_numeric(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}
