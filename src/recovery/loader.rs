//! Hint log replay
//!
//! The loader scans the hint log in file order and applies each record to a
//! fresh key directory: locations hydrate entry bytes from the data log,
//! tombstones remove keys. Replay is deterministic; the same log pair
//! always produces the same directory.
//!
//! Skip policy: a record that cannot be parsed or hydrated (truncated line,
//! non-UTF-8 bytes, bad JSON, offset past end of file) is counted and
//! skipped, because the common cause is a crash mid-append and the records
//! before it are intact. Hard I/O failures abort the load instead.

use crate::index::KeyDir;
use crate::log::{DataLogReader, HintLogReader, HintRecord, LogPaths, LogResult};

/// Statistics from one hint log replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Location records applied to the directory
    pub entries_loaded: u64,
    /// Tombstone records applied
    pub tombstones_applied: u64,
    /// Malformed or truncated records skipped
    pub records_skipped: u64,
}

/// Rebuilds the key directory from the on-disk log pair.
pub struct Loader;

impl Loader {
    /// Replays the hint log into a fresh key directory.
    ///
    /// A missing hint log means an empty store. A missing data log while a
    /// hint log exists is a hard error; the two files are created as a pair
    /// by every write path.
    pub fn load(paths: &LogPaths) -> LogResult<(KeyDir, LoadStats)> {
        let mut keydir = KeyDir::new();
        let mut stats = LoadStats::default();

        let hint_path = paths.hint_log();
        if !hint_path.exists() {
            return Ok((keydir, stats));
        }

        let mut hints = HintLogReader::open(&hint_path)?;
        let mut data = DataLogReader::open(&paths.data_log())?;

        loop {
            let record = match hints.read_next() {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(e) if e.is_malformed() => {
                    stats.records_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match record {
                HintRecord::Location {
                    key,
                    offset,
                    length,
                } => match data.read_at(offset, length) {
                    Ok(entry) => {
                        keydir.insert(key, entry);
                        stats.entries_loaded += 1;
                    }
                    Err(e) if e.is_malformed() => stats.records_skipped += 1,
                    Err(e) => return Err(e),
                },
                HintRecord::Tombstone { key } => {
                    keydir.remove(&key);
                    stats.tombstones_applied += 1;
                }
            }
        }

        Ok((keydir, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{Entry, LogWriter};
    use std::fs;
    use std::fs::OpenOptions;
    use std::io::Write;
    use tempfile::TempDir;

    fn entry(value: &[u8]) -> Entry {
        Entry::without_expiry(value.to_vec())
    }

    fn append_raw_hint(paths: &LogPaths, line: &str) {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(paths.hint_log())
            .unwrap();
        writeln!(file, "{}", line).unwrap();
    }

    #[test]
    fn test_missing_hint_log_means_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        let (keydir, stats) = Loader::load(&paths).unwrap();

        assert!(keydir.is_empty());
        assert_eq!(stats, LoadStats::default());
    }

    #[test]
    fn test_empty_logs_mean_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());
        let _writer = LogWriter::open(&paths).unwrap();

        let (keydir, stats) = Loader::load(&paths).unwrap();

        assert!(keydir.is_empty());
        assert_eq!(stats.records_skipped, 0);
    }

    #[test]
    fn test_load_replays_puts() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        {
            let mut writer = LogWriter::open(&paths).unwrap();
            writer.append("a", &entry(b"1")).unwrap();
            writer.append("b", &entry(b"2")).unwrap();
        }

        let (keydir, stats) = Loader::load(&paths).unwrap();

        assert_eq!(keydir.len(), 2);
        assert_eq!(keydir.get("a").unwrap().value, b"1");
        assert_eq!(keydir.get("b").unwrap().value, b"2");
        assert_eq!(stats.entries_loaded, 2);
        assert_eq!(stats.records_skipped, 0);
    }

    #[test]
    fn test_later_record_supersedes_earlier() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        {
            let mut writer = LogWriter::open(&paths).unwrap();
            writer.append("k", &entry(b"old")).unwrap();
            writer.append("k", &entry(b"new")).unwrap();
        }

        let (keydir, stats) = Loader::load(&paths).unwrap();

        assert_eq!(keydir.len(), 1);
        assert_eq!(keydir.get("k").unwrap().value, b"new");
        assert_eq!(stats.entries_loaded, 2);
    }

    #[test]
    fn test_tombstone_removes_key() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        {
            let mut writer = LogWriter::open(&paths).unwrap();
            writer.append("k", &entry(b"v")).unwrap();
            writer.append_tombstone("k").unwrap();
        }

        let (keydir, stats) = Loader::load(&paths).unwrap();

        assert!(keydir.is_empty());
        assert_eq!(stats.tombstones_applied, 1);
    }

    #[test]
    fn test_put_after_tombstone_undeletes() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        {
            let mut writer = LogWriter::open(&paths).unwrap();
            writer.append("k", &entry(b"first")).unwrap();
            writer.append_tombstone("k").unwrap();
            writer.append("k", &entry(b"second")).unwrap();
        }

        let (keydir, _) = Loader::load(&paths).unwrap();

        assert_eq!(keydir.get("k").unwrap().value, b"second");
    }

    #[test]
    fn test_tombstone_for_absent_key_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        {
            let mut writer = LogWriter::open(&paths).unwrap();
            writer.append_tombstone("never-put").unwrap();
        }

        let (keydir, stats) = Loader::load(&paths).unwrap();

        assert!(keydir.is_empty());
        assert_eq!(stats.tombstones_applied, 1);
    }

    #[test]
    fn test_malformed_hint_line_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        {
            let mut writer = LogWriter::open(&paths).unwrap();
            writer.append("a", &entry(b"1")).unwrap();
        }
        append_raw_hint(&paths, "!!not a record!!");
        {
            let mut writer = LogWriter::open(&paths).unwrap();
            writer.append("b", &entry(b"2")).unwrap();
        }

        let (keydir, stats) = Loader::load(&paths).unwrap();

        assert_eq!(keydir.len(), 2);
        assert_eq!(stats.records_skipped, 1);
        assert_eq!(stats.entries_loaded, 2);
    }

    #[test]
    fn test_non_utf8_hint_line_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        {
            let mut writer = LogWriter::open(&paths).unwrap();
            writer.append("keep", &entry(b"kept")).unwrap();
        }

        // A non-ASCII key cut mid-character by a crash, no trailing newline.
        let mut file = OpenOptions::new()
            .append(true)
            .open(paths.hint_log())
            .unwrap();
        file.write_all(b"caf\xC3").unwrap();

        let (keydir, stats) = Loader::load(&paths).unwrap();

        assert_eq!(keydir.len(), 1);
        assert_eq!(keydir.get("keep").unwrap().value, b"kept");
        assert_eq!(stats.records_skipped, 1);
        assert_eq!(stats.entries_loaded, 1);
    }

    #[test]
    fn test_hint_into_truncated_data_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        {
            let mut writer = LogWriter::open(&paths).unwrap();
            writer.append("early", &entry(b"kept")).unwrap();
            writer.append("late", &entry(b"lost to truncation")).unwrap();
        }

        // Cut the second record short, as a crash mid-append would.
        let data = fs::read(paths.data_log()).unwrap();
        fs::write(paths.data_log(), &data[..data.len() - 8]).unwrap();

        let (keydir, stats) = Loader::load(&paths).unwrap();

        assert_eq!(keydir.len(), 1);
        assert_eq!(keydir.get("early").unwrap().value, b"kept");
        assert_eq!(stats.records_skipped, 1);
    }

    #[test]
    fn test_orphaned_data_record_is_invisible() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());
        let _writer = LogWriter::open(&paths).unwrap();

        // A data record with no hint record never happened as far as
        // recovery is concerned.
        let mut file = OpenOptions::new()
            .append(true)
            .open(paths.data_log())
            .unwrap();
        file.write_all(&entry(b"orphan").serialize().unwrap())
            .unwrap();
        file.write_all(b"\n").unwrap();

        let (keydir, stats) = Loader::load(&paths).unwrap();

        assert!(keydir.is_empty());
        assert_eq!(stats.records_skipped, 0);
    }

    #[test]
    fn test_missing_data_log_with_hints_is_hard_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());
        append_raw_hint(&paths, "k:0:10");

        let err = Loader::load(&paths).unwrap_err();
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_load_preserves_expiry_deadline() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogPaths::new(temp_dir.path());

        let written = Entry::new(b"v".to_vec(), Some(std::time::Duration::from_secs(3600)));
        {
            let mut writer = LogWriter::open(&paths).unwrap();
            writer.append("k", &written).unwrap();
        }

        let (keydir, _) = Loader::load(&paths).unwrap();

        assert_eq!(keydir.get("k").unwrap().expires_at, written.expires_at);
    }
}
