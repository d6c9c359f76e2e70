//! PII redaction engine for exported social-media JSON

pub mod keys;
pub mod redactor;

pub use keys::{KeyMatcher, KeyRule, KeyRules};
pub use redactor::{DEFAULT_MAX_DEPTH, REDACTED, RedactionReport, Redactor};
