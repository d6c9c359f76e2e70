mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::Commands;
use donate_config::Config;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so redacted output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        Commands::Init { force } => commands::init::handle(cli.config, force),
        command => {
            let config = load_config(cli.config.as_deref())?;
            run(command, &config).await
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Keys { input, json } => commands::keys::handle(config, input, json).await,
        Commands::Preview {
            input,
            redact,
            redactions,
            show_payload,
        } => commands::preview::handle(config, input, redact, redactions, show_payload).await,
        Commands::Export {
            inputs,
            redact,
            out_dir,
            id,
        } => commands::export::handle(config, inputs, redact, out_dir, id).await,
        Commands::Submit {
            input,
            redact,
            consents,
            id,
        } => commands::submit::handle(config, input, redact, consents, id).await,
        Commands::Survey(args) => commands::survey::handle(config, args).await,
        Commands::Platforms => commands::platforms::handle(config),
        Commands::Init { force } => commands::init::handle(None, force),
    }
}
