use anyhow::Result;
use donate_config::Config;
use donate_core::{
    AnonymousId, ConsentSet, Platform, SensitiveKeys, Survey, redacted_file_name,
    survey_file_name,
};
use donate_security::{KeyRules, RedactionReport, Redactor};
use donate_sources::Upload;
use donate_storage::{DonationFolders, FileRecord, StorageSink};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::PathBuf;

const JSON_MIME: &str = "application/json";

/// Redacted upload, ready for preview, download or submission
#[derive(Debug, Clone)]
pub struct PreparedDonation {
    pub source: PathBuf,
    pub platform: Platform,
    /// Parsed upload before redaction
    pub document: Value,
    /// Keys the donor may additionally choose to redact
    pub available_keys: BTreeSet<String>,
    pub sensitive: SensitiveKeys,
    pub redacted: Value,
    pub report: RedactionReport,
}

impl PreparedDonation {
    pub fn file_name(&self, id: &AnonymousId) -> String {
        redacted_file_name(id, self.platform, &self.source)
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        pretty_json(&self.redacted)
    }
}

/// Outcome of a successful submission
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub anonymous_id: AnonymousId,
    pub platform: Platform,
    pub file: FileRecord,
}

/// Runs uploads through the redaction engine and hands results to storage
pub struct DonationEngine {
    config: Config,
    redactor: Redactor,
}

impl DonationEngine {
    pub fn new(config: Config) -> Result<Self> {
        let rules = KeyRules::with_custom(&config.redaction.custom_patterns)?;
        let redactor = Redactor::with_rules(rules)
            .max_depth(config.redaction.max_depth)
            .collision_policy(config.redaction.collision);

        Ok(Self { config, redactor })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    /// Keys offered to the donor for manual redaction
    pub fn available_keys(&self, upload: &Upload) -> Result<BTreeSet<String>> {
        let document = upload.document(self.config.redaction.max_depth)?;
        Ok(self.redactor.extract_keys(&document)?)
    }

    pub fn prepare<I, S>(&self, upload: &Upload, platform: Platform, extras: I) -> Result<PreparedDonation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // 1. Decode and parse
        let document = upload.document(self.config.redaction.max_depth)?;

        // 2. Offer keys
        let available_keys = self.redactor.extract_keys(&document)?;

        // 3. Assemble sensitive set
        let extras: Vec<String> = extras.into_iter().map(Into::into).collect();
        for extra in &extras {
            if !available_keys.contains(extra) {
                tracing::warn!(key = %extra, "selected key does not occur in the upload");
            }
        }
        let sensitive = self.config.pii.sensitive_for(platform, extras);

        // 4. Anonymize
        let (redacted, report) = self.redactor.anonymize_with_report(&document, &sensitive)?;

        tracing::info!(
            source = %upload.name,
            %platform,
            keys = available_keys.len(),
            redacted = report.total(),
            "prepared donation"
        );

        Ok(PreparedDonation {
            source: upload.path().to_path_buf(),
            platform,
            document,
            available_keys,
            sensitive,
            redacted,
            report,
        })
    }

    /// Upload a prepared donation once every consent is given
    pub async fn submit<S: StorageSink + ?Sized>(
        &self,
        prepared: &PreparedDonation,
        consents: &ConsentSet,
        sink: &S,
        id: &AnonymousId,
    ) -> Result<Receipt> {
        consents.require_all()?;

        let folders = DonationFolders::provision(sink, id, prepared.platform).await?;
        let name = prepared.file_name(id);
        let payload = prepared.to_pretty_json()?;

        let file = sink
            .upload(&folders.redacted, &name, payload.as_bytes(), JSON_MIME)
            .await?;

        tracing::info!(file = %file.name, anonymous_id = %id, "submitted donation");

        Ok(Receipt {
            anonymous_id: id.clone(),
            platform: prepared.platform,
            file,
        })
    }

    pub async fn submit_survey<S: StorageSink + ?Sized>(
        &self,
        survey: &Survey,
        sink: &S,
    ) -> Result<FileRecord> {
        let folders = DonationFolders::provision(sink, &survey.anonymous_id, survey.platform).await?;
        let payload = serde_json::to_string_pretty(survey)?;

        let file = sink
            .upload(
                &folders.survey,
                &survey_file_name(&survey.anonymous_id),
                payload.as_bytes(),
                JSON_MIME,
            )
            .await?;

        tracing::info!(file = %file.name, "submitted survey");
        Ok(file)
    }
}

/// Two-space indented JSON, the format donations are stored in
pub fn pretty_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use donate_core::CollisionPolicy;
    use serde_json::json;

    fn upload(json: &str) -> Upload {
        Upload::new("exports/user_data.json", json.as_bytes().to_vec())
    }

    #[test]
    fn test_prepare_applies_common_platform_and_extra_keys() {
        let engine = DonationEngine::new(Config::default()).unwrap();
        let upload = upload(
            r#"{"username": "alice", "Profile": {"bioDescription": "hi", "likes": 3}, "Video": {"Link": "x"}}"#,
        );

        let prepared = engine.prepare(&upload, Platform::TikTok, ["Link"]).unwrap();

        assert_eq!(
            prepared.redacted,
            json!({
                "username": "REDACTED",
                "Profile": {"bioDescription": "REDACTED", "likes": 3},
                "Video": {"Link": "REDACTED"}
            })
        );
        assert_eq!(prepared.report.total(), 3);
        assert_eq!(prepared.document["username"], "alice");
        assert!(prepared.available_keys.contains("Link"));
        assert!(prepared.sensitive.contains("Link"));
    }

    #[test]
    fn test_file_name_and_payload() {
        let engine = DonationEngine::new(Config::default()).unwrap();
        let prepared = engine
            .prepare(&upload(r#"{"a": [1]}"#), Platform::Reddit, Vec::<String>::new())
            .unwrap();
        let id: AnonymousId = "0a1b2c3d".parse().unwrap();

        assert_eq!(prepared.file_name(&id), "0a1b2c3d_Reddit_user_data.json");
        assert_eq!(prepared.to_pretty_json().unwrap(), "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn test_config_controls_redactor() {
        let mut config = Config::default();
        config.redaction.collision = CollisionPolicy::Reject;
        config.redaction.custom_patterns = vec!["messages with .+".to_string()];
        let engine = DonationEngine::new(config).unwrap();

        assert_eq!(engine.redactor().sanitize_key("Messages with dan"), "Messages With Dan");
        assert!(engine
            .prepare(&upload(r#"{"x:": 1, "x": 2}"#), Platform::Twitter, Vec::<String>::new())
            .is_err());
    }

    #[test]
    fn test_invalid_custom_pattern_fails_construction() {
        let mut config = Config::default();
        config.redaction.custom_patterns = vec!["[".to_string()];
        assert!(DonationEngine::new(config).is_err());
    }
}
