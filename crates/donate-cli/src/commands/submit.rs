use anyhow::Result;
use donate_config::Config;
use donate_core::{AnonymousId, Consent, ConsentSet};
use donate_engine::DonationEngine;
use donate_sources::SourceHandlerRegistry;

use crate::cli::RedactArgs;
use crate::commands::open_storage;

pub async fn handle(
    config: &Config,
    input: String,
    args: RedactArgs,
    consents: Vec<Consent>,
    id: Option<AnonymousId>,
) -> Result<()> {
    let consents: ConsentSet = consents.into_iter().collect();

    if !consents.is_complete() {
        println!("Please agree to all consents to proceed. Missing:");
        for consent in consents.missing() {
            println!("  --consent {}  \"{}\"", consent.flag(), consent.statement());
        }
    }
    consents.require_all()?;

    let engine = DonationEngine::new(config.clone())?;
    let upload = SourceHandlerRegistry::new().load(&input).await?;
    let prepared = engine.prepare(&upload, args.platform, args.redact)?;

    let storage = open_storage(config).await?;
    let id = id.unwrap_or_else(AnonymousId::generate);
    let receipt = engine.submit(&prepared, &consents, &storage, &id).await?;

    println!("✓ Uploaded {} (ID: {})", receipt.file.name, receipt.anonymous_id);
    println!("  Values redacted: {}", prepared.report.total());
    println!("  Save this ID; it is needed for data management or deletion.");

    Ok(())
}
