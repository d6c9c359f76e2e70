//! Per-donor folder hierarchy
//!
//! ```text
//! {root}/{anonymous_id}/{platform}/redacted/
//! {root}/{anonymous_id}/survey/
//! ```

use donate_core::{AnonymousId, Platform};

use crate::{FolderId, Result, StorageSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationFolders {
    pub user: FolderId,
    pub platform: FolderId,
    pub redacted: FolderId,
    pub survey: FolderId,
}

impl DonationFolders {
    /// Find or create every folder a donation needs
    pub async fn provision<S: StorageSink + ?Sized>(
        sink: &S,
        id: &AnonymousId,
        platform: Platform,
    ) -> Result<Self> {
        let user = sink.get_or_create_folder(id.as_str(), &sink.root()).await?;
        let platform = sink.get_or_create_folder(platform.as_str(), &user).await?;
        let redacted = sink.get_or_create_folder("redacted", &platform).await?;
        let survey = sink.get_or_create_folder("survey", &user).await?;

        Ok(Self {
            user,
            platform,
            redacted,
            survey,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Storage;

    #[tokio::test]
    async fn test_provision_twice_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path()).await.unwrap();
        let id: AnonymousId = "0a1b2c3d".parse().unwrap();

        let first = DonationFolders::provision(&storage, &id, Platform::TikTok)
            .await
            .unwrap();
        let second = DonationFolders::provision(&storage, &id, Platform::TikTok)
            .await
            .unwrap();
        assert_eq!(first, second);

        // Another platform shares the user and survey folders
        let other = DonationFolders::provision(&storage, &id, Platform::Reddit)
            .await
            .unwrap();
        assert_eq!(other.user, first.user);
        assert_eq!(other.survey, first.survey);
        assert_ne!(other.redacted, first.redacted);
    }
}
