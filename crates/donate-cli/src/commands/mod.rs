pub mod export;
pub mod init;
pub mod keys;
pub mod platforms;
pub mod preview;
pub mod submit;
pub mod survey;

use anyhow::Result;
use donate_config::Config;
use donate_storage::Storage;

/// Open the storage configured for this machine
pub async fn open_storage(config: &Config) -> Result<Storage> {
    let root = config.storage_root();
    tracing::debug!(root = %root.display(), "opening storage");
    Ok(Storage::new(&root).await?)
}
