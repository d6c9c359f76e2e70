//! Content-addressable blob storage

use crate::{Result, StorageError};
use std::path::PathBuf;

/// Blob store for uploaded file contents
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Store content and return its hash
    pub async fn store(&self, content: &[u8]) -> Result<String> {
        let hash = blake3::hash(content).to_hex().to_string();
        let path = self.path_for_hash(&hash);

        if tokio::fs::try_exists(&path).await? {
            return Ok(hash);
        }

        if let Some(shard) = path.parent() {
            tokio::fs::create_dir_all(shard).await?;
        }

        // Write then rename so readers never see a partial blob
        let tmp = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;

        Ok(hash)
    }

    /// Retrieve content by hash
    pub async fn retrieve(&self, hash: &str) -> Result<Vec<u8>> {
        if !self.exists(hash) {
            return Err(StorageError::BlobNotFound(hash.to_string()));
        }
        Ok(tokio::fs::read(self.path_for_hash(hash)).await?)
    }

    /// Check if blob exists
    pub fn exists(&self, hash: &str) -> bool {
        is_valid_hash(hash) && self.path_for_hash(hash).is_file()
    }

    /// {root}/blake3/{hash[0:2]}/{hash}
    fn path_for_hash(&self, hash: &str) -> PathBuf {
        self.root.join("blake3").join(&hash[..2]).join(hash)
    }
}

fn is_valid_hash(hash: &str) -> bool {
    hash.len() == 64 && hash.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_retrieve() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path().join("blobs")).unwrap();

        let hash = blobs.store(b"{\"a\": 1}").await.unwrap();
        assert!(blobs.exists(&hash));
        assert!(
            dir.path()
                .join("blobs/blake3")
                .join(&hash[..2])
                .join(&hash)
                .is_file()
        );

        let again = blobs.store(b"{\"a\": 1}").await.unwrap();
        assert_eq!(hash, again);
        assert_eq!(blobs.retrieve(&hash).await.unwrap(), b"{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_missing_and_malformed_hashes() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path().to_path_buf()).unwrap();

        assert!(!blobs.exists("x"));
        assert!(matches!(
            blobs.retrieve("../etc").await,
            Err(StorageError::BlobNotFound(_))
        ));
        let unknown = "0".repeat(64);
        assert!(matches!(
            blobs.retrieve(&unknown).await,
            Err(StorageError::BlobNotFound(_))
        ));
    }
}
