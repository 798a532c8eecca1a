use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "glassdeck")]
#[command(about = "Dashboard runtime for smart-glasses hosts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the app against the stdio simulator (events in on stdin, bridge calls out on stdout)
    Run {
        /// Storage file of the simulator (default: from config)
        #[arg(long)]
        storage: Option<PathBuf>,

        /// Keep simulator storage in memory only
        #[arg(long, conflicts_with = "storage")]
        ephemeral: bool,

        /// Rows per list page, controls included
        #[arg(long)]
        rows_per_page: Option<usize>,
    },

    /// Read raw bridge events (NDJSON) from stdin and print the canonical events
    Normalize {
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set {
        /// One of: log_filter, rows_per_page, autoscroll_interval_ms, feed_timeout_secs, storage_file
        key: String,

        /// New value
        value: String,
    },
}
