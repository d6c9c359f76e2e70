use anyhow::Result;
use donate_config::Config;
use donate_engine::DonationEngine;
use donate_sources::SourceHandlerRegistry;

use crate::cli::RedactArgs;

pub async fn handle(
    config: &Config,
    input: String,
    args: RedactArgs,
    show_redactions: bool,
    show_payload: bool,
) -> Result<()> {
    let engine = DonationEngine::new(config.clone())?;
    let upload = SourceHandlerRegistry::new().load(&input).await?;
    let prepared = engine.prepare(&upload, args.platform, args.redact)?;

    println!("Previewing: {} ({})", upload.name, prepared.platform);
    println!("keys found: {}", prepared.available_keys.len());
    println!("sensitive keys: {}", prepared.sensitive.len());
    println!("values redacted: {}", prepared.report.total());

    if !prepared.report.collisions.is_empty() {
        println!("\nKey collisions ({}):", prepared.report.collisions.len());
        for key in &prepared.report.collisions {
            println!("  - {}", key);
        }
    }

    if show_redactions && !prepared.report.redacted.is_empty() {
        println!("\nRedactions:");
        for (key, count) in &prepared.report.redacted {
            println!("  - {}: {}", key, count);
        }
    }

    if show_payload {
        println!("\n--- PAYLOAD START ---");
        println!("{}", prepared.to_pretty_json()?);
        println!("--- PAYLOAD END ---");
    }

    Ok(())
}
