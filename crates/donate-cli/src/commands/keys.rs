use anyhow::Result;
use donate_config::Config;
use donate_engine::DonationEngine;
use donate_sources::SourceHandlerRegistry;

pub async fn handle(config: &Config, input: String, json: bool) -> Result<()> {
    let engine = DonationEngine::new(config.clone())?;
    let upload = SourceHandlerRegistry::new().load(&input).await?;
    let keys = engine.available_keys(&upload)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&keys)?);
        return Ok(());
    }

    if keys.is_empty() {
        println!("No keys found.");
        return Ok(());
    }

    println!("Keys in {} ({}):", upload.name, keys.len());
    for key in keys {
        println!("  {}", key);
    }

    Ok(())
}
