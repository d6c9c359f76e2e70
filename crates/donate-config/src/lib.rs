use donate_core::{CollisionPolicy, DEFAULT_MAX_DEPTH, Platform, SensitiveKeys};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration for donate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pii: PiiConfig,

    #[serde(default)]
    pub redaction: RedactionConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Key sets that are always redacted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiConfig {
    /// Keys redacted for every platform
    #[serde(default = "default_common")]
    pub common: Vec<String>,

    /// Additional keys per platform, keyed by platform name
    #[serde(default = "default_platforms")]
    pub platforms: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Deepest container nesting accepted, when parsing and when redacting
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub collision: CollisionPolicy,

    /// Extra key patterns, matched from the start of a key, case-insensitively
    #[serde(default)]
    pub custom_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the folder registry and uploaded blobs
    pub root: Option<PathBuf>,
}

impl Default for PiiConfig {
    fn default() -> Self {
        Self {
            common: default_common(),
            platforms: default_platforms(),
        }
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            collision: CollisionPolicy::default(),
            custom_patterns: Vec::new(),
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_common() -> Vec<String> {
    strings(&[
        "username",
        "userName",
        "email",
        "emailAddress",
        "id",
        "name",
        "full_name",
        "telephoneNumber",
        "birthDate",
    ])
}

fn default_platforms() -> BTreeMap<String, Vec<String>> {
    let sets = [
        (
            Platform::TikTok,
            strings(&[
                "profilePhoto",
                "profileVideo",
                "bioDescription",
                "likesReceived",
                "From",
                "Content",
            ]),
        ),
        (
            Platform::Instagram,
            strings(&[
                "biography",
                "followers_count",
                "following_count",
                "media_count",
                "profile_picture",
            ]),
        ),
        (
            Platform::Facebook,
            strings(&["friend_count", "friends", "posts", "story", "comments", "likes"]),
        ),
        (
            Platform::Twitter,
            strings(&[
                "created_at",
                "text",
                "source",
                "in_reply_to_status_id",
                "in_reply_to_user_id",
                "retweet_count",
                "favorite_count",
            ]),
        ),
        (
            Platform::Reddit,
            strings(&[
                "subreddit",
                "author",
                "body",
                "selftext",
                "post_id",
                "created_utc",
                "title",
            ]),
        ),
    ];
    sets.into_iter()
        .map(|(platform, keys)| (platform.to_string(), keys))
        .collect()
}

impl PiiConfig {
    /// Keys configured for one platform (empty if none are)
    pub fn platform_keys(&self, platform: Platform) -> &[String] {
        self.platforms
            .get(platform.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Common keys, platform keys and user-selected extras
    pub fn sensitive_for<I, S>(&self, platform: Platform, extras: I) -> SensitiveKeys
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SensitiveKeys::assemble(
            self.common.iter().cloned(),
            self.platform_keys(platform).iter().cloned(),
            extras,
        )
    }
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            // Create default config file
            let config = Config::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("org", "donate", "donate") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.donate/config.toml")
        }
    }

    /// Storage root from config, else the platform data directory
    pub fn storage_root(&self) -> PathBuf {
        if let Some(root) = &self.storage.root {
            return root.clone();
        }
        if let Some(dirs) = directories::ProjectDirs::from("org", "donate", "donate") {
            dirs.data_dir().join("storage")
        } else {
            PathBuf::from("~/.donate/storage")
        }
    }
}
