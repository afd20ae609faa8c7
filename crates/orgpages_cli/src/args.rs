//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about = "Resolve organization extension pages", long_about = None)]
pub struct Arguments {
    /// SQLite database holding organizations and their pages
    #[arg(long, env = "ORGPAGES_DB", default_value = "orgpages.db")]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "ORGPAGES_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "ORGPAGES_LOG_DIR")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upsert organizations from a JSON array file
    Import {
        file: PathBuf,
    },
    /// Render the page addressed by an organization extension URL
    Render {
        /// e.g. /organizations/acme/extension/billing/overview?tab=usage
        url: String,
        /// Invoke the page's refresh capability and render again
        #[arg(long)]
        refresh: bool,
    },
    /// List stored organization keys
    List,
}
