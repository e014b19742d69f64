//! On-disk layout of a store directory
//!
//! A store directory holds two live files, `data.log` and `hintfile.log`,
//! plus short-lived compaction temporaries that are renamed over the live
//! files on success.

use std::path::{Path, PathBuf};

/// Data log file name
pub const DATA_LOG: &str = "data.log";
/// Hint log file name
pub const HINT_LOG: &str = "hintfile.log";
/// Compaction temporary for the data log
pub const TEMP_DATA_LOG: &str = "data.log.tmp";
/// Compaction temporary for the hint log
pub const TEMP_HINT_LOG: &str = "hintfile.log.tmp";

/// Resolves the fixed log file names inside a store directory.
#[derive(Debug, Clone)]
pub struct LogPaths {
    dir: PathBuf,
}

impl LogPaths {
    /// Create a path resolver rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the live data log path
    pub fn data_log(&self) -> PathBuf {
        self.dir.join(DATA_LOG)
    }

    /// Returns the live hint log path
    pub fn hint_log(&self) -> PathBuf {
        self.dir.join(HINT_LOG)
    }

    /// Returns the compaction temporary data log path
    pub fn temp_data_log(&self) -> PathBuf {
        self.dir.join(TEMP_DATA_LOG)
    }

    /// Returns the compaction temporary hint log path
    pub fn temp_hint_log(&self) -> PathBuf {
        self.dir.join(TEMP_HINT_LOG)
    }
}
