use anyhow::Result;
use donate_config::Config;
use std::path::PathBuf;

pub fn handle(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(Config::config_path);

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(&path)?;

    println!("✓ Wrote default config to {}", path.display());
    println!("  Edit [pii] to change which keys are always redacted");

    Ok(())
}
