//! CLI argument definitions using clap
//!
//! Commands:
//! - cinderdb --dir <path> put <key> <value> [--ttl <seconds>]
//! - cinderdb --dir <path> get <key>
//! - cinderdb --dir <path> delete <key>
//! - cinderdb --dir <path> list
//! - cinderdb --dir <path> sync
//! - cinderdb --dir <path> compact

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cinderdb - an embedded, log-structured, persistent key-value store
#[derive(Parser, Debug)]
#[command(name = "cinderdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Store directory holding the log files
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a value under a key
    Put {
        /// Key to store under
        key: String,

        /// Value to store
        value: String,

        /// Time-to-live in seconds; omitted or zero means never expires
        #[arg(long)]
        ttl: Option<u64>,
    },

    /// Print the value stored under a key
    Get {
        /// Key to look up
        key: String,
    },

    /// Remove a key
    Delete {
        /// Key to remove
        key: String,
    },

    /// Print all live keys, one per line
    List,

    /// Force pending writes to disk
    Sync,

    /// Rewrite the logs, dropping stale and expired records
    Compact,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
