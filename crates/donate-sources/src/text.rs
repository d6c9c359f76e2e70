use async_trait::async_trait;
use donate_core::{Error, Result};

use crate::handler::{SourceHandler, Upload};

/// Inline JSON given as `text:<json>`
pub struct TextHandler;

#[async_trait]
impl SourceHandler for TextHandler {
    async fn load(&self, uri: &str) -> Result<Upload> {
        let content = uri
            .strip_prefix("text:")
            .ok_or_else(|| Error::InvalidSource(format!("Invalid text URI: {}", uri)))?;

        Ok(Upload::new("inline.json", content.as_bytes().to_vec()))
    }

    fn can_handle(&self, uri: &str) -> bool {
        uri.starts_with("text:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inline_text() {
        let upload = TextHandler.load("text:[1]").await.unwrap();
        assert_eq!(upload.name, "inline.json");
        assert_eq!(upload.bytes, b"[1]");
    }

    #[tokio::test]
    async fn test_rejects_other_uris() {
        assert!(TextHandler.load("file:x.json").await.is_err());
    }
}
