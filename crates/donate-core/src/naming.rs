//! Anonymous identifiers and output file naming

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::{Error, Platform};

const ID_LEN: usize = 8;

/// Short anonymous identifier a donor keeps to request deletion later
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnonymousId(String);

impl AnonymousId {
    /// First 8 hex characters of a random UUIDv4
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self(hex[..ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnonymousId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AnonymousId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == ID_LEN
            && s
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::InvalidInput(format!(
                "anonymous id must be {} lowercase hex characters, got '{}'",
                ID_LEN, s
            )))
        }
    }
}

impl TryFrom<String> for AnonymousId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AnonymousId> for String {
    fn from(id: AnonymousId) -> Self {
        id.0
    }
}

/// `{id}_{platform}_{basename}.json`, basename without its extension
pub fn redacted_file_name(id: &AnonymousId, platform: Platform, original: &Path) -> String {
    let base = original
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    format!("{}_{}_{}.json", id, platform, base)
}

pub fn survey_file_name(id: &AnonymousId) -> String {
    format!("{}_survey.json", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_valid() {
        let id = AnonymousId::generate();
        assert_eq!(id.as_str().len(), 8);
        assert!(id.as_str().parse::<AnonymousId>().is_ok());
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert!("ABCDEF12".parse::<AnonymousId>().is_err());
        assert!("abc".parse::<AnonymousId>().is_err());
        assert!("abcdefgh".parse::<AnonymousId>().is_err());
    }

    #[test]
    fn test_redacted_file_name() {
        let id: AnonymousId = "0a1b2c3d".parse().unwrap();
        let name = redacted_file_name(&id, Platform::TikTok, Path::new("/tmp/exports/user_data.json"));
        assert_eq!(name, "0a1b2c3d_TikTok_user_data.json");
    }

    #[test]
    fn test_redacted_file_name_without_extension() {
        let id: AnonymousId = "0a1b2c3d".parse().unwrap();
        let name = redacted_file_name(&id, Platform::Reddit, Path::new("comments"));
        assert_eq!(name, "0a1b2c3d_Reddit_comments.json");
    }

    #[test]
    fn test_survey_file_name() {
        let id: AnonymousId = "deadbeef".parse().unwrap();
        assert_eq!(survey_file_name(&id), "deadbeef_survey.json");
    }
}
