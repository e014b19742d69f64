//! CLI module for cinderdb
//!
//! One-shot command-line access to a store directory: each invocation
//! opens the store, runs a single operation, prints to stdout, and closes
//! the store. Engine errors surface on stderr with a nonzero exit.

mod args;
mod commands;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
