use anyhow::{Context, Result};
use donate_config::Config;
use donate_core::AnonymousId;
use donate_engine::DonationEngine;
use donate_sources::{SourceHandlerRegistry, expand_inputs};
use std::path::{Path, PathBuf};

use crate::cli::RedactArgs;

pub async fn handle(
    config: &Config,
    inputs: Vec<String>,
    args: RedactArgs,
    out_dir: PathBuf,
    id: Option<AnonymousId>,
) -> Result<()> {
    let id = id.unwrap_or_else(AnonymousId::generate);
    let written = export(config, &inputs, &args, &out_dir, &id).await?;

    println!("Anonymous ID: {}", id);
    for path in written {
        println!("✓ Wrote {}", path.display());
    }

    Ok(())
}

/// Redact every input and write it under `out_dir`; returns written paths
pub async fn export(
    config: &Config,
    inputs: &[String],
    args: &RedactArgs,
    out_dir: &Path,
    id: &AnonymousId,
) -> Result<Vec<PathBuf>> {
    let engine = DonationEngine::new(config.clone())?;
    let registry = SourceHandlerRegistry::new();

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut written = Vec::new();
    for path in expand_inputs(inputs)? {
        let upload = registry.load(&path.display().to_string()).await?;
        let prepared = engine.prepare(&upload, args.platform, args.redact.iter().cloned())?;

        let target = out_dir.join(prepared.file_name(id));
        std::fs::write(&target, prepared.to_pretty_json()?)
            .with_context(|| format!("writing {}", target.display()))?;
        written.push(target);
    }

    Ok(written)
}
