//! Data log entry type
//!
//! The data log record format is one JSON object per line:
//!
//! ```text
//! {"value":[...bytes...],"expires_at":"2026-08-25T12:00:00Z"}\n
//! ```
//!
//! `expires_at` is omitted for entries that never expire. The trailing
//! newline is the record separator and is not counted in the record length
//! stored in the hint log. JSON never contains a raw newline, so the
//! separator is unambiguous.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{LogError, LogResult};

/// A single key's payload: the value bytes plus an optional expiry deadline.
///
/// This is both the unit stored in the in-memory key directory and the unit
/// serialized into the data log. Superseding writes append a fresh entry;
/// nothing is updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Value bytes
    pub value: Vec<u8>,
    /// Expiry deadline; `None` means the entry never expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// Create an entry from value bytes and an optional time-to-live.
    ///
    /// A missing or zero TTL produces an entry that never expires. So does
    /// a TTL too large to represent as a timestamp delta, or one whose
    /// deadline would land past the representable calendar range.
    pub fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl
            .filter(|d| !d.is_zero())
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .and_then(|d| Utc::now().checked_add_signed(d));
        Self { value, expires_at }
    }

    /// Create an entry that never expires
    pub fn without_expiry(value: Vec<u8>) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Returns whether this entry is expired as of `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(deadline) => deadline < now,
            None => false,
        }
    }

    /// Serializes the entry to its data log record body (no separator).
    pub fn serialize(&self) -> LogResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| LogError::malformed_record(format!("entry serialization failed: {}", e)))
    }

    /// Deserializes an entry from a data log record body.
    pub fn deserialize(bytes: &[u8]) -> LogResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| LogError::malformed_record(format!("entry deserialization failed: {}", e)))
    }
}
