//! Read path for the data and hint logs
//!
//! Both readers are recovery-facing. Malformed records are survivable:
//! they come back as `CINDER_MALFORMED_RECORD` errors and the reader stays
//! usable, so the loader can skip the bad record and keep scanning. A hint
//! line that is not valid UTF-8 (a multibyte key torn mid-append) counts
//! as malformed too. Hard I/O failures (open, seek, read) are not
//! survivable and abort the load.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::entry::Entry;
use super::errors::{LogError, LogResult};
use super::hint::HintRecord;

/// Random-access reader over the data log.
///
/// Hydrates single entries at hint-recorded locations.
#[derive(Debug)]
pub struct DataLogReader {
    /// Underlying file handle
    file: File,
    /// Total file size at open time
    file_size: u64,
}

impl DataLogReader {
    /// Opens the data log for reading.
    pub fn open(path: &Path) -> LogResult<Self> {
        let file = File::open(path).map_err(|e| {
            LogError::io_error(format!("Failed to open data log: {}", path.display()), e)
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| LogError::io_error("Failed to stat data log", e))?
            .len();

        Ok(Self { file, file_size })
    }

    /// Reads and deserializes the entry at the given location.
    ///
    /// A location that extends past the end of the file, or bytes that do
    /// not deserialize, is a malformed record. The bounds check runs before
    /// any allocation so a corrupt hint length cannot trigger an oversized
    /// buffer.
    pub fn read_at(&mut self, offset: u64, length: u64) -> LogResult<Entry> {
        if offset.checked_add(length).map_or(true, |end| end > self.file_size) {
            return Err(LogError::malformed_at_offset(
                offset,
                format!(
                    "record of {} bytes extends past data log end ({} bytes)",
                    length, self.file_size
                ),
            ));
        }

        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|e| LogError::read_failed(format!("Failed to seek to offset {}", offset), e))?;

        let mut buf = vec![0u8; length as usize];
        self.file.read_exact(&mut buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                LogError::malformed_at_offset(offset, "record truncated mid-read")
            } else {
                LogError::read_failed(format!("Failed to read record at offset {}", offset), e)
            }
        })?;

        Entry::deserialize(&buf)
            .map_err(|e| LogError::malformed_at_offset(offset, e.message().to_string()))
    }
}

/// Sequential reader over the hint log.
///
/// Yields records in file order, one per line.
pub struct HintLogReader {
    /// Line iterator over the hint log
    lines: io::Lines<BufReader<File>>,
    /// 1-based number of the last line handed out
    line_number: u64,
}

impl HintLogReader {
    /// Opens the hint log for sequential scanning.
    pub fn open(path: &Path) -> LogResult<Self> {
        let file = File::open(path).map_err(|e| {
            LogError::io_error(format!("Failed to open hint log: {}", path.display()), e)
        })?;

        Ok(Self {
            lines: BufReader::new(file).lines(),
            line_number: 0,
        })
    }

    /// Reads the next hint record.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(CINDER_MALFORMED_RECORD)` for an unparseable or non-UTF-8
    ///   line; the reader has already advanced past it and may keep being
    ///   called
    pub fn read_next(&mut self) -> LogResult<Option<HintRecord>> {
        let line = match self.lines.next() {
            Some(Ok(line)) => line,
            // The line iterator consumes through the separator before the
            // UTF-8 check fails, so the next call resumes at the next line.
            Some(Err(e)) if e.kind() == io::ErrorKind::InvalidData => {
                self.line_number += 1;
                return Err(LogError::malformed_line(
                    self.line_number,
                    format!("hint line is not valid UTF-8: {}", e),
                ));
            }
            Some(Err(e)) => {
                return Err(LogError::read_failed(
                    format!("Failed to read hint log line {}", self.line_number + 1),
                    e,
                ))
            }
            None => return Ok(None),
        };
        self.line_number += 1;

        HintRecord::parse(&line)
            .map(Some)
            .map_err(|e| LogError::malformed_line(self.line_number, e.message().to_string()))
    }

    /// Returns the 1-based line number of the last record returned.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}
