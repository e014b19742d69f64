//! Append path for the data and hint logs
//!
//! Every committed write touches both files in a fixed order: the entry
//! bytes go to the data log first, the location record to the hint log
//! second. Recovery trusts only the hint log, so a crash between the two
//! appends leaves an orphaned data record that is invisible to readers and
//! reclaimed at the next compaction. The reverse order could leave a hint
//! pointing at data that was never written, which is why the ordering is
//! load-bearing.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};

use super::entry::Entry;
use super::errors::{LogError, LogResult};
use super::hint::HintRecord;
use super::paths::LogPaths;

/// Byte location of an appended entry within the data log.
///
/// `length` excludes the record separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLocation {
    /// Offset of the first byte of the record
    pub offset: u64,
    /// Length of the record body in bytes
    pub length: u64,
}

/// Append-only writer over the data log and hint log pair.
///
/// Appends are write-through (no user-space buffering); `sync` forces both
/// files durable. Each record's offset is taken from the data log's current
/// end position, so a failed partial append cannot poison the offsets of
/// later records.
#[derive(Debug)]
pub struct LogWriter {
    /// Data log handle, opened in append mode
    data_file: File,
    /// Hint log handle, opened in append mode
    hint_file: File,
}

impl LogWriter {
    /// Opens or creates the log pair inside the store directory.
    pub fn open(paths: &LogPaths) -> LogResult<Self> {
        let data_path = paths.data_log();
        let data_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&data_path)
            .map_err(|e| {
                LogError::io_error(
                    format!("Failed to open data log: {}", data_path.display()),
                    e,
                )
            })?;

        let hint_path = paths.hint_log();
        let hint_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&hint_path)
            .map_err(|e| {
                LogError::io_error(
                    format!("Failed to open hint log: {}", hint_path.display()),
                    e,
                )
            })?;

        Ok(Self {
            data_file,
            hint_file,
        })
    }

    /// Appends an entry to the data log and its location to the hint log.
    ///
    /// Returns the entry's location in the data log. The hint append only
    /// happens after the data append succeeded; on failure of either, the
    /// caller must not update its index.
    pub fn append(&mut self, key: &str, entry: &Entry) -> LogResult<EntryLocation> {
        let mut record = entry.serialize()?;
        let length = record.len() as u64;
        record.push(b'\n');

        // Append mode writes land at end-of-file; the seek reports where
        // that is without trusting any in-memory counter.
        let offset = self
            .data_file
            .seek(SeekFrom::End(0))
            .map_err(|e| LogError::append_failed("Failed to locate data log end", e))?;

        self.data_file.write_all(&record).map_err(|e| {
            LogError::append_failed(format!("Failed to append entry for key: {}", key), e)
        })?;

        let location = EntryLocation { offset, length };
        self.append_hint(&HintRecord::location(key, offset, length))?;

        Ok(location)
    }

    /// Appends a tombstone record to the hint log.
    ///
    /// The data log is untouched; the key's stale bytes become garbage.
    pub fn append_tombstone(&mut self, key: &str) -> LogResult<()> {
        self.append_hint(&HintRecord::tombstone(key))
    }

    /// Appends one hint record line.
    fn append_hint(&mut self, record: &HintRecord) -> LogResult<()> {
        let mut line = record.to_line();
        line.push('\n');
        self.hint_file.write_all(line.as_bytes()).map_err(|e| {
            LogError::append_failed(
                format!("Failed to append hint record for key: {}", record.key()),
                e,
            )
        })
    }

    /// Forces both logs durable with fsync.
    pub fn sync(&mut self) -> LogResult<()> {
        self.data_file
            .sync_all()
            .map_err(|e| LogError::fsync_failed("fsync failed on data log", e))?;
        self.hint_file
            .sync_all()
            .map_err(|e| LogError::fsync_failed("fsync failed on hint log", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entry(value: &[u8]) -> Entry {
        Entry::without_expiry(value.to_vec())
    }

    #[test]
    fn test_open_creates_log_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        let _writer = LogWriter::open(&paths).unwrap();

        assert!(paths.data_log().exists());
        assert!(paths.hint_log().exists());
    }

    #[test]
    fn test_open_in_missing_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path().join("missing"));

        let err = LogWriter::open(&paths).unwrap_err();
        assert_eq!(err.code().code(), "CINDER_LOG_IO_ERROR");
    }

    #[test]
    fn test_append_returns_readable_location() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());
        let mut writer = LogWriter::open(&paths).unwrap();

        let e = entry(b"payload");
        let location = writer.append("k", &e).unwrap();

        let data = fs::read(paths.data_log()).unwrap();
        let start = location.offset as usize;
        let end = start + location.length as usize;
        assert_eq!(Entry::deserialize(&data[start..end]).unwrap(), e);
        assert_eq!(data[end], b'\n');
    }

    #[test]
    fn test_append_writes_hint_line() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());
        let mut writer = LogWriter::open(&paths).unwrap();

        let location = writer.append("k", &entry(b"v")).unwrap();

        let hint = fs::read_to_string(paths.hint_log()).unwrap();
        assert_eq!(
            hint,
            format!("k:{}:{}\n", location.offset, location.length)
        );
    }

    #[test]
    fn test_offsets_advance_past_separator() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());
        let mut writer = LogWriter::open(&paths).unwrap();

        let first = writer.append("a", &entry(b"one")).unwrap();
        let second = writer.append("b", &entry(b"two")).unwrap();

        assert_eq!(first.offset, 0);
        assert_eq!(second.offset, first.offset + first.length + 1);
    }

    #[test]
    fn test_append_tombstone_writes_marker() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());
        let mut writer = LogWriter::open(&paths).unwrap();

        writer.append("k", &entry(b"v")).unwrap();
        writer.append_tombstone("k").unwrap();

        let hint = fs::read_to_string(paths.hint_log()).unwrap();
        assert!(hint.ends_with("k:DELETE\n"));

        // Tombstones never touch the data log.
        let data_len = fs::metadata(paths.data_log()).unwrap().len();
        writer.append_tombstone("k").unwrap();
        assert_eq!(fs::metadata(paths.data_log()).unwrap().len(), data_len);
    }

    #[test]
    fn test_reopen_continues_at_end() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        let first = {
            let mut writer = LogWriter::open(&paths).unwrap();
            writer.append("a", &entry(b"one")).unwrap()
        };

        let mut writer = LogWriter::open(&paths).unwrap();
        let second = writer.append("b", &entry(b"two")).unwrap();

        assert_eq!(second.offset, first.offset + first.length + 1);
        let hint = fs::read_to_string(paths.hint_log()).unwrap();
        assert_eq!(hint.lines().count(), 2);
    }

    #[test]
    fn test_sync_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());
        let mut writer = LogWriter::open(&paths).unwrap();

        writer.append("k", &entry(b"v")).unwrap();
        writer.sync().unwrap();
    }
}
