//! Log subsystem error types
//!
//! Error codes:
//! - CINDER_LOG_IO_ERROR (ERROR severity) - opening or statting a log file
//! - CINDER_LOG_APPEND_FAILED (ERROR severity)
//! - CINDER_LOG_FSYNC_FAILED (FATAL severity)
//! - CINDER_LOG_READ_FAILED (ERROR severity)
//! - CINDER_MALFORMED_RECORD (ERROR severity) - recovery skips these
//! - CINDER_LOG_SWAP_FAILED (ERROR severity)

use std::fmt;
use std::io;

/// Severity levels for log errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, engine continues
    Error,
    /// Durability can no longer be trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Error codes for the data/hint log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorCode {
    /// Opening, creating, or statting a log file failed
    IoError,
    /// Append to the data or hint log failed
    AppendFailed,
    /// fsync of a log file or the store directory failed
    FsyncFailed,
    /// Read or seek on a log file failed
    ReadFailed,
    /// A record could not be parsed or is truncated
    MalformedRecord,
    /// Swapping compacted logs into place failed
    SwapFailed,
}

impl LogErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorCode::IoError => "CINDER_LOG_IO_ERROR",
            LogErrorCode::AppendFailed => "CINDER_LOG_APPEND_FAILED",
            LogErrorCode::FsyncFailed => "CINDER_LOG_FSYNC_FAILED",
            LogErrorCode::ReadFailed => "CINDER_LOG_READ_FAILED",
            LogErrorCode::MalformedRecord => "CINDER_MALFORMED_RECORD",
            LogErrorCode::SwapFailed => "CINDER_LOG_SWAP_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            LogErrorCode::IoError => Severity::Error,
            LogErrorCode::AppendFailed => Severity::Error,
            LogErrorCode::FsyncFailed => Severity::Fatal,
            LogErrorCode::ReadFailed => Severity::Error,
            LogErrorCode::MalformedRecord => Severity::Error,
            LogErrorCode::SwapFailed => Severity::Error,
        }
    }
}

impl fmt::Display for LogErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Log error type carrying code, severity, and optional I/O source
#[derive(Debug)]
pub struct LogError {
    /// Error code
    code: LogErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl LogError {
    /// Create a new I/O error for open/create/stat failures
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::IoError,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new append failure error
    pub fn append_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::AppendFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new fsync failure error (FATAL)
    pub fn fsync_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::FsyncFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new read failure error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::ReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new malformed record error
    pub fn malformed_record(message: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::MalformedRecord,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a malformed record error with byte offset context
    pub fn malformed_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::MalformedRecord,
            message: reason.into(),
            details: Some(format!("byte_offset: {}", offset)),
            source: None,
        }
    }

    /// Create a malformed record error with hint line context
    pub fn malformed_line(line_number: u64, reason: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::MalformedRecord,
            message: reason.into(),
            details: Some(format!("line: {}", line_number)),
            source: None,
        }
    }

    /// Create a new swap failure error
    pub fn swap_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::SwapFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> LogErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this record error is survivable during recovery
    pub fn is_malformed(&self) -> bool {
        self.code == LogErrorCode::MalformedRecord
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for log operations
pub type LogResult<T> = Result<T, LogError>;
