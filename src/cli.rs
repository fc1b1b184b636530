//! CLI argument parsing for a single polling run.
//!
//! There are no subcommands: every invocation fetches, reconciles, persists,
//! and notifies once. Scheduling is left to cron or CI.
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_WEB_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 60;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "relwatch",
    version,
    about = "Poll release feeds and catalogs, record the latest releases, and report new ones",
    after_help = "Examples:\n  relwatch --sources sources.yaml --state state.json\n  WEBHOOK_URL=https://hooks.example.com/x relwatch\n  relwatch --dry-run --verbose"
)]
pub struct RootArgs {
    /// YAML file listing `www` and `ota` source URLs
    #[arg(long, value_name = "PATH", default_value = "sources.yaml")]
    pub sources: PathBuf,

    /// JSON snapshot of the previous run, rewritten on every run
    #[arg(long, value_name = "PATH", default_value = "state.json")]
    pub state: PathBuf,

    /// Endpoint that receives new releases as JSON
    #[arg(long, value_name = "URL", env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Bearer token sent with webhook requests
    #[arg(long, value_name = "TOKEN", env = "WEBHOOK_TOKEN", hide_env_values = true)]
    pub webhook_token: Option<String>,

    /// Request timeout for feeds, release pages and the webhook
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_WEB_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Fetch and reconcile, but do not write state or notify
    #[arg(long)]
    pub dry_run: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long)]
    pub verbose: bool,
}
