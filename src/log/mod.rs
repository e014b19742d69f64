//! Data and hint log subsystem for cinderdb
//!
//! The log pair is the persistent state of the store: an append-only data
//! log of JSON entry records and an append-only, line-oriented hint log of
//! key locations and tombstones. The hint log is the recovery index; the
//! data log is only ever read at hint-recorded offsets.
//!
//! # Design Principles
//!
//! - Append-only (no in-place updates)
//! - Data log write precedes hint log write for every committed entry
//! - Recovery trusts only the hint log; orphaned data bytes are garbage
//! - Malformed records are skippable, hard I/O errors are not
//! - Latest hint record wins for the same key

mod entry;
mod errors;
mod hint;
mod paths;
mod reader;
mod writer;

pub use entry::Entry;
pub use errors::{LogError, LogErrorCode, LogResult, Severity};
pub use hint::HintRecord;
pub use paths::{LogPaths, DATA_LOG, HINT_LOG, TEMP_DATA_LOG, TEMP_HINT_LOG};
pub use reader::{DataLogReader, HintLogReader};
pub use writer::{EntryLocation, LogWriter};
