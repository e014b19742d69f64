//! Hint log record types
//!
//! The hint log is line-oriented text, one record per line:
//!
//! ```text
//! <key>:<offset>:<length>     location of the key's latest entry
//! <key>:DELETE                tombstone for the key
//! ```
//!
//! The key comes first, so location fields are parsed from the right and
//! keys may themselves contain `:`. Record order is semantically
//! significant: replayed in file order, a later record for a key always
//! supersedes an earlier one.

use super::errors::{LogError, LogResult};

/// Marker suffix for tombstone records
const TOMBSTONE_SUFFIX: &str = ":DELETE";

/// A single parsed hint log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintRecord {
    /// The key's latest entry lives at `offset` in the data log and is
    /// `length` bytes long (separator excluded).
    Location { key: String, offset: u64, length: u64 },
    /// The key was deleted; any prior location is void.
    Tombstone { key: String },
}

impl HintRecord {
    /// Create a location record
    pub fn location(key: impl Into<String>, offset: u64, length: u64) -> Self {
        HintRecord::Location {
            key: key.into(),
            offset,
            length,
        }
    }

    /// Create a tombstone record
    pub fn tombstone(key: impl Into<String>) -> Self {
        HintRecord::Tombstone { key: key.into() }
    }

    /// Returns the key this record applies to
    pub fn key(&self) -> &str {
        match self {
            HintRecord::Location { key, .. } => key,
            HintRecord::Tombstone { key } => key,
        }
    }

    /// Formats the record as one hint log line (no trailing newline).
    pub fn to_line(&self) -> String {
        match self {
            HintRecord::Location {
                key,
                offset,
                length,
            } => format!("{}:{}:{}", key, offset, length),
            HintRecord::Tombstone { key } => format!("{}{}", key, TOMBSTONE_SUFFIX),
        }
    }

    /// Parses one hint log line.
    ///
    /// A location line never ends in `:DELETE` (its last field is numeric),
    /// so the tombstone suffix is checked first and the remaining cases
    /// split into exactly three fields from the right.
    pub fn parse(line: &str) -> LogResult<Self> {
        if let Some(key) = line.strip_suffix(TOMBSTONE_SUFFIX) {
            if key.is_empty() {
                return Err(LogError::malformed_record("tombstone record with empty key"));
            }
            return Ok(HintRecord::tombstone(key));
        }

        let mut fields = line.rsplitn(3, ':');
        let length_field = fields.next();
        let offset_field = fields.next();
        let key_field = fields.next();

        let (key, offset_field, length_field) = match (key_field, offset_field, length_field) {
            (Some(key), Some(offset), Some(length)) if !key.is_empty() => (key, offset, length),
            _ => {
                return Err(LogError::malformed_record(format!(
                    "hint line is not a location or tombstone record: {:?}",
                    line
                )))
            }
        };

        let offset = offset_field.parse::<u64>().map_err(|_| {
            LogError::malformed_record(format!("invalid offset field: {:?}", offset_field))
        })?;
        let length = length_field.parse::<u64>().map_err(|_| {
            LogError::malformed_record(format!("invalid length field: {:?}", length_field))
        })?;

        Ok(HintRecord::location(key, offset, length))
    }
}
