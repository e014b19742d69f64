//! Core log-merge logic
//!
//! # Crash Safety
//!
//! - Crash before either rename: live logs unchanged, stale temp files are
//!   truncated by the next run and removed at open
//! - Crash between the renames: the new data log is live while the old
//!   hint log still points into it; those records fail hydration at the
//!   next load and are skipped
//! - Crash after both renames: the compacted pair is live and complete
//!
//! The data log is renamed first, keeping the write path's data-first
//! discipline through the swap.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::index::KeyDir;
use crate::log::{HintRecord, LogError, LogPaths, LogResult};

/// Statistics from one compaction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionStats {
    /// Live entries carried into the new logs
    pub entries_kept: u64,
    /// Entries dropped because they were expired at the cut
    pub entries_expired: u64,
}

/// fsync a directory so renames within it are durable.
fn fsync_dir(path: &Path) -> LogResult<()> {
    let dir = OpenOptions::new().read(true).open(path).map_err(|e| {
        LogError::fsync_failed(
            format!("Failed to open directory for fsync: {}", path.display()),
            e,
        )
    })?;

    dir.sync_all().map_err(|e| {
        LogError::fsync_failed(format!("fsync directory failed: {}", path.display()), e)
    })
}

/// Removes compaction temporaries.
///
/// Best effort: used on the failure path and as crash hygiene at open.
pub fn remove_temp_logs(paths: &LogPaths) {
    let _ = fs::remove_file(paths.temp_data_log());
    let _ = fs::remove_file(paths.temp_hint_log());
}

/// Rewrites the log pair from a consistent cut of the key directory.
pub struct Compactor;

impl Compactor {
    /// Runs one compaction over the given directory state.
    ///
    /// `keydir` must be a consistent cut: the caller holds the store's
    /// state lock, so no write can interleave with the scan or the swap.
    /// Entries expired as of `now` are dropped even if no reaper sweep has
    /// seen them yet.
    pub fn compact(
        paths: &LogPaths,
        keydir: &KeyDir,
        now: DateTime<Utc>,
    ) -> LogResult<CompactionStats> {
        let result = Self::write_and_swap(paths, keydir, now);
        if result.is_err() {
            remove_temp_logs(paths);
        }
        result
    }

    fn write_and_swap(
        paths: &LogPaths,
        keydir: &KeyDir,
        now: DateTime<Utc>,
    ) -> LogResult<CompactionStats> {
        let temp_data_path = paths.temp_data_log();
        let mut temp_data = File::create(&temp_data_path).map_err(|e| {
            LogError::io_error(
                format!(
                    "Failed to create temp data log: {}",
                    temp_data_path.display()
                ),
                e,
            )
        })?;

        let temp_hint_path = paths.temp_hint_log();
        let mut temp_hint = File::create(&temp_hint_path).map_err(|e| {
            LogError::io_error(
                format!(
                    "Failed to create temp hint log: {}",
                    temp_hint_path.display()
                ),
                e,
            )
        })?;

        let mut stats = CompactionStats::default();
        let mut offset: u64 = 0;

        // Sorted key order makes the rewritten logs a deterministic
        // function of the directory state.
        for key in keydir.sorted_keys() {
            let entry = match keydir.get(&key) {
                Some(entry) => entry,
                None => continue,
            };

            if entry.is_expired(now) {
                stats.entries_expired += 1;
                continue;
            }

            let mut record = entry.serialize()?;
            let length = record.len() as u64;
            record.push(b'\n');

            temp_data.write_all(&record).map_err(|e| {
                LogError::append_failed(
                    format!("Failed to write compacted entry for key: {}", key),
                    e,
                )
            })?;

            let mut line = HintRecord::location(key.as_str(), offset, length).to_line();
            line.push('\n');
            temp_hint.write_all(line.as_bytes()).map_err(|e| {
                LogError::append_failed(
                    format!("Failed to write compacted hint for key: {}", key),
                    e,
                )
            })?;

            offset += record.len() as u64;
            stats.entries_kept += 1;
        }

        // Both temp files must be durable before either rename.
        temp_data
            .sync_all()
            .map_err(|e| LogError::fsync_failed("fsync failed on temp data log", e))?;
        temp_hint
            .sync_all()
            .map_err(|e| LogError::fsync_failed("fsync failed on temp hint log", e))?;

        // Rename-over replaces atomically; the old files are never removed
        // ahead of their replacements. Data log first.
        fs::rename(&temp_data_path, paths.data_log())
            .map_err(|e| LogError::swap_failed("Failed to swap data log into place", e))?;
        fs::rename(&temp_hint_path, paths.hint_log())
            .map_err(|e| LogError::swap_failed("Failed to swap hint log into place", e))?;

        fsync_dir(paths.dir())?;

        Ok(stats)
    }
}
