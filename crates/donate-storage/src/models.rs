use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Opaque folder identifier issued by a storage sink
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub String);

impl FolderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub folder_id: FolderId,
    pub name: String,
    pub content_hash: String,
    pub size_bytes: u64,
    pub mime_type: String,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}
