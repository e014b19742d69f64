//! Recovery subsystem for cinderdb
//!
//! Recovery rebuilds the key directory from the hint log, once, inside
//! `Store::open`, before any operation is served. Reads never touch the
//! logs again after that.
//!
//! # Startup Sequence (strict order)
//!
//! 1. If no hint log exists, the store is empty
//! 2. Open the data log (missing data log with a hint log present is an
//!    I/O error)
//! 3. Scan hint records sequentially in file order
//! 4. Hydrate each location record from the data log; apply tombstones
//! 5. Skip and count malformed or truncated records; abort on hard I/O
//!    failure
//! 6. Hand the populated directory to the store
//!
//! # Invariants
//!
//! - The hint log is the single source of truth for recovery
//! - Sequential replay in file order; later records supersede earlier ones
//! - A skipped record never aborts the load; a read failure always does

mod loader;

pub use loader::{LoadStats, Loader};
