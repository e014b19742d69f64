//! cinderdb CLI entry point
//!
//! Minimal entrypoint: parse and dispatch via cli::run, print errors to
//! stderr, exit nonzero on failure. All logic lives in the library.

use cinderdb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
