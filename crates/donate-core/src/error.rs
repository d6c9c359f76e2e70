use thiserror::Error;

use crate::Consent;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Nesting depth exceeds limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("Multiple keys sanitize to '{key}' in the same object")]
    KeyCollision { key: String },

    #[error("Invalid key pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Missing consent: {}", format_consents(.0))]
    ConsentMissing(Vec<Consent>),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

fn format_consents(consents: &[Consent]) -> String {
    consents
        .iter()
        .map(|c| c.flag())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
