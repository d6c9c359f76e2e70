//! Upload destination trait

use async_trait::async_trait;

use crate::{FileRecord, FolderId, Result};

/// Folder-based upload destination.
///
/// Folder names are unique per parent. `get_or_create_folder` looks the
/// folder up first and only creates it when absent, so provisioning the
/// same hierarchy twice yields the same ids.
#[async_trait]
pub trait StorageSink: Send + Sync {
    /// Top-level folder all donations live under
    fn root(&self) -> FolderId;

    async fn find_folder(&self, name: &str, parent: &FolderId) -> Result<Option<FolderId>>;

    /// Create a folder; returns the existing id if one was created concurrently
    async fn create_folder(&self, name: &str, parent: &FolderId) -> Result<FolderId>;

    async fn upload(
        &self,
        folder: &FolderId,
        name: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<FileRecord>;

    async fn list_files(&self, folder: &FolderId) -> Result<Vec<FileRecord>>;

    async fn get_or_create_folder(&self, name: &str, parent: &FolderId) -> Result<FolderId> {
        if let Some(id) = self.find_folder(name, parent).await? {
            return Ok(id);
        }
        self.create_folder(name, parent).await
    }
}
