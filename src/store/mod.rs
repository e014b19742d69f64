//! Store subsystem for cinderdb
//!
//! The engine facade over the log, index, recovery, and compaction layers.
//! `Store::open` recovers the key directory from the on-disk log pair,
//! spawns the expiry reaper, and serves every operation from memory under
//! a single state lock.
//!
//! # Design Principles
//!
//! - One instance per directory; no global state
//! - Recovery completes before the first operation is served
//! - Writes reach the logs before the directory is updated
//! - Expired entries answer `NotFound` and are evicted lazily
//! - `close` stops the reaper and flushes both logs

mod config;
mod engine;
mod errors;

pub use config::StoreConfig;
pub use engine::{Store, StoreCore};
pub use errors::{StoreError, StoreResult};
