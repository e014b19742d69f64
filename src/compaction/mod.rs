//! Compaction subsystem for cinderdb
//!
//! Compaction rewrites the log pair to contain only the entries that are
//! live in the key directory at the moment it runs. Superseded versions,
//! tombstones, and expired entries all vanish from disk; the directory
//! itself is not modified.
//!
//! # Rewrite Sequence (strict order)
//!
//! 1. Create both temp files, truncating leftovers from a crashed run
//! 2. Append every live, non-expired entry, keys in sorted order
//! 3. fsync both temp files
//! 4. Rename the temp data log over `data.log`
//! 5. Rename the temp hint log over `hintfile.log`
//! 6. fsync the store directory
//!
//! Any failure before step 4 leaves the live logs untouched and removes
//! the temp files best-effort. The caller must hold the store's state lock
//! across the whole sequence and reopen its writer handles afterwards; the
//! old handles reference replaced inodes.

mod compactor;

pub use compactor::{remove_temp_logs, CompactionStats, Compactor};
