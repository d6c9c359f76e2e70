use async_trait::async_trait;
use donate_core::{Error, Result};

use crate::handler::{SourceHandler, Upload};

pub struct FileHandler;

#[async_trait]
impl SourceHandler for FileHandler {
    async fn load(&self, uri: &str) -> Result<Upload> {
        let path = uri.strip_prefix("file:").unwrap_or(uri);

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::InvalidSource(format!("Failed to read file {}: {}", path, e))
        })?;

        tracing::debug!(path, size = bytes.len(), "read upload");

        Ok(Upload::new(path, bytes))
    }

    fn can_handle(&self, uri: &str) -> bool {
        uri.starts_with("file:") || !uri.starts_with("text:")
    }
}
