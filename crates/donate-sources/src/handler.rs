//! Source handler trait

use async_trait::async_trait;
use donate_core::{Error, Result};
use serde_json::Value;
use std::borrow::Cow;
use std::path::Path;

use crate::decode::{decode_upload, parse_document};
use crate::file::FileHandler;
use crate::text::TextHandler;

/// Raw upload as received from the donor
#[derive(Debug, Clone)]
pub struct Upload {
    /// Original file name or path, used to name the redacted output
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.name)
    }

    pub fn text(&self) -> Cow<'_, str> {
        decode_upload(&self.bytes)
    }

    /// Decode and parse the upload into a JSON document
    pub fn document(&self, max_depth: usize) -> Result<Value> {
        parse_document(&self.text(), max_depth)
    }
}

/// Trait for handling different source types
#[async_trait]
pub trait SourceHandler: Send + Sync {
    /// Read the upload behind a source URI
    async fn load(&self, uri: &str) -> Result<Upload>;

    /// Check if this handler can handle the given URI
    fn can_handle(&self, uri: &str) -> bool;
}

/// Dispatches source URIs to the first handler that accepts them
pub struct SourceHandlerRegistry {
    handlers: Vec<Box<dyn SourceHandler>>,
}

impl SourceHandlerRegistry {
    pub fn new() -> Self {
        Self {
            // File handler goes last, it accepts bare paths
            handlers: vec![Box::new(TextHandler), Box::new(FileHandler)],
        }
    }

    pub async fn load(&self, uri: &str) -> Result<Upload> {
        let handler = self
            .handlers
            .iter()
            .find(|h| h.can_handle(uri))
            .ok_or_else(|| Error::InvalidSource(format!("No handler for {}", uri)))?;
        handler.load(uri).await
    }
}

impl Default for SourceHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donate_core::DEFAULT_MAX_DEPTH;
    use serde_json::json;

    #[tokio::test]
    async fn test_registry_dispatches_text() {
        let registry = SourceHandlerRegistry::new();
        let upload = registry.load("text:{\"email\": \"a@b.c\"}").await.unwrap();
        assert_eq!(upload.document(DEFAULT_MAX_DEPTH).unwrap(), json!({"email": "a@b.c"}));
    }

    #[tokio::test]
    async fn test_registry_dispatches_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, b"\xEF\xBB\xBF[1, 2]").unwrap();

        let registry = SourceHandlerRegistry::new();
        let upload = registry.load(&path.display().to_string()).await.unwrap();

        assert_eq!(upload.path().file_name().unwrap(), "export.json");
        assert_eq!(upload.document(DEFAULT_MAX_DEPTH).unwrap(), json!([1, 2]));
    }
}
