//! In-memory key directory subsystem for cinderdb
//!
//! The key directory is derived, in-memory-only state rebuilt from the hint
//! log on every open. Once populated it is the single source of truth for
//! reads; it is never persisted directly.
//!
//! # Design Principles
//!
//! - Derived state: mirrors the logs, never the source of truth on disk
//! - In-memory only: no persistence
//! - Updated only after the corresponding log appends succeed
//! - No expiry logic: callers compare `expires_at` against the clock

mod keydir;

pub use keydir::KeyDir;
