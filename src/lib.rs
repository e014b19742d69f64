//! cinderdb - an embedded, log-structured, persistent key-value store
//!
//! Writes append to an on-disk data log, a line-oriented hint log records
//! where each key's latest value lives, and an in-memory key directory
//! serves every read. Startup replays the hint log; compaction rewrites
//! both logs from live data; a background reaper evicts expired entries.

pub mod cli;
pub mod compaction;
pub mod index;
pub mod log;
pub mod observability;
mod reaper;
pub mod recovery;
pub mod store;

pub use store::{Store, StoreConfig, StoreError, StoreResult};
