//! CLI command implementations
//!
//! Each invocation opens the store (running recovery), performs one
//! operation, prints the outcome to stdout, and closes the store. The
//! process is one-shot, so the background reaper stays off; expired
//! entries are still filtered and evicted on read and dropped by compact.

use std::time::Duration;

use crate::store::{Store, StoreConfig, StoreResult};

use super::args::{Cli, Command};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command. This is
/// the only function main.rs should call.
pub fn run() -> StoreResult<()> {
    run_command(Cli::parse_args())
}

/// Open the store, execute one command, close the store
pub fn run_command(cli: Cli) -> StoreResult<()> {
    let store = Store::open_with(StoreConfig::new(cli.dir).without_reaper())?;
    let outcome = execute(&store, cli.command);
    let closed = store.close();
    outcome.and(closed)
}

fn execute(store: &Store, command: Command) -> StoreResult<()> {
    match command {
        Command::Put { key, value, ttl } => {
            store.put(&key, value.as_bytes(), ttl.map(Duration::from_secs))
        }
        Command::Get { key } => {
            let value = store.get(&key)?;
            println!("{}", String::from_utf8_lossy(&value));
            Ok(())
        }
        Command::Delete { key } => store.delete(&key),
        Command::List => {
            for key in store.list_keys()? {
                println!("{}", key);
            }
            Ok(())
        }
        Command::Sync => store.sync(),
        Command::Compact => {
            let stats = store.compact()?;
            println!(
                "kept {} entries, dropped {} expired",
                stats.entries_kept, stats.entries_expired
            );
            Ok(())
        }
    }
}
