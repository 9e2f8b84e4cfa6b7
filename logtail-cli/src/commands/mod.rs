//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod logs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Tail or dump the logs of an application
    Logs {
        /// Application name
        app_name: String,

        /// Dump recent logs instead of tailing
        #[arg(long)]
        recent: bool,

        /// Sort recent logs by timestamp
        #[arg(long, requires = "recent")]
        sort: bool,
    },
}

/// Handle a CLI command
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Logs {
            app_name,
            recent,
            sort,
        } => logs::handle_logs_command(&app_name, recent, sort, config).await,
    }
}
