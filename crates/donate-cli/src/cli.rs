use clap::{Args, Parser, Subcommand};
use donate_core::{AnonymousId, Consent, Platform, SurveyChoice};
use std::path::PathBuf;
use time::Date;
use time::macros::format_description;

#[derive(Parser)]
#[command(name = "donate")]
#[command(about = "Redact and donate social-media data exports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "DONATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Platform and keys to redact, shared by every redacting command
#[derive(Args, Debug, Clone)]
pub struct RedactArgs {
    /// Platform the export comes from (TikTok, Instagram, Facebook, Twitter, Reddit)
    #[arg(long)]
    pub platform: Platform,

    /// Additional key to redact (repeatable)
    #[arg(long = "redact", value_name = "KEY")]
    pub redact: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the keys found in an export
    Keys {
        /// Source URI (file path, file:path or text:json)
        input: String,

        /// Output as JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show what would be redacted
    Preview {
        /// Source URI (file path, file:path or text:json)
        input: String,

        #[command(flatten)]
        redact: RedactArgs,

        /// Show redaction counts per key
        #[arg(long)]
        redactions: bool,

        /// Show the redacted document
        #[arg(long)]
        show_payload: bool,
    },

    /// Write redacted copies of exports to a directory
    Export {
        /// Files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        #[command(flatten)]
        redact: RedactArgs,

        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Anonymous ID to name files with (generated if omitted)
        #[arg(long)]
        id: Option<AnonymousId>,
    },

    /// Redact an export and submit it to storage
    Submit {
        /// Source URI (file path, file:path or text:json)
        input: String,

        #[command(flatten)]
        redact: RedactArgs,

        /// Consent given (voluntary, research-use, deletion, independent)
        #[arg(long = "consent", value_name = "CONSENT", value_delimiter = ',')]
        consents: Vec<Consent>,

        /// Anonymous ID from an earlier submission (generated if omitted)
        #[arg(long)]
        id: Option<AnonymousId>,
    },

    /// Answer the optional research survey
    Survey(SurveyArgs),

    /// List platforms and the keys redacted for them
    Platforms,

    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct SurveyArgs {
    /// Anonymous ID shown after submitting data
    #[arg(long)]
    pub id: AnonymousId,

    #[arg(long)]
    pub platform: Platform,

    /// yes, no or already-answered
    #[arg(long, default_value = "yes")]
    pub choice: SurveyChoice,

    /// Have you ever been active in a social movement?
    #[arg(long)]
    pub active_movement: bool,

    /// Active in a social movement since
    #[arg(long, value_parser = parse_date, requires = "active_movement")]
    pub movement_from: Option<Date>,

    /// Active in a social movement until
    #[arg(long, value_parser = parse_date, requires = "active_movement")]
    pub movement_until: Option<Date>,

    /// Kind of movement
    #[arg(long, requires = "active_movement")]
    pub movement_kind: Option<String>,

    /// Have you ever participated in a protest?
    #[arg(long)]
    pub participated_protest: bool,

    /// Date of first protest
    #[arg(long, value_parser = parse_date, requires = "participated_protest")]
    pub protest_first: Option<Date>,

    /// Date of last protest
    #[arg(long, value_parser = parse_date, requires = "participated_protest")]
    pub protest_last: Option<Date>,

    /// Why you joined or stopped protesting
    #[arg(long, requires = "participated_protest")]
    pub protest_reason: Option<String>,

    /// A post you particularly remember
    #[arg(long)]
    pub remembered_post: Option<String>,
}

/// YYYY-MM-DD
pub fn parse_date(s: &str) -> Result<Date, String> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("invalid date '{}': {}", s, e))
}
