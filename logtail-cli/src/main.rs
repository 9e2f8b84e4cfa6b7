//! Logtail CLI
//!
//! Command-line interface for tailing application logs from the log cache.

mod commands;
mod config;
mod display;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "logtail")]
#[command(about = "Tail application logs from the log cache", long_about = None)]
struct Cli {
    /// Cloud controller API URL
    #[arg(long, env = "LOGTAIL_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Log cache URL (derived from the API URL when omitted)
    #[arg(long, env = "LOGTAIL_LOG_CACHE_URL")]
    log_cache_url: Option<String>,

    /// Bearer token sent to both services
    #[arg(long, env = "LOGTAIL_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// GUID of the space the application lives in
    #[arg(long = "space", env = "LOGTAIL_SPACE_GUID", global = true)]
    space_guid: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so they never mix with log output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logtail=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::new(
        cli.api_url,
        cli.log_cache_url,
        cli.access_token,
        cli.space_guid.unwrap_or_default(),
    );
    config.validate()?;

    handle_command(cli.command, &config).await
}
