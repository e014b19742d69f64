//! Structured JSON event logging
//!
//! One event is one JSON object on one stderr line. Key order is
//! deterministic: `event` first, `severity` second, remaining fields
//! sorted by name. There is no timestamp field, so the same sequence of
//! store operations logs the same bytes on every run.
//!
//! Everything goes to stderr: the store is embedded, so stdout belongs
//! to the process hosting it.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable failures
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value of a single event field.
///
/// Counters stay numeric in the output instead of being stringified at
/// the call site; everything else is an escaped JSON string.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    /// Rendered as an escaped JSON string
    Str(&'a str),
    /// Rendered as a bare JSON number
    Count(u64),
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Str(value)
    }
}

impl<'a> From<u64> for FieldValue<'a> {
    fn from(value: u64) -> Self {
        FieldValue::Count(value)
    }
}

impl<'a> From<usize> for FieldValue<'a> {
    fn from(value: usize) -> Self {
        FieldValue::Count(value as u64)
    }
}

/// One named field on an event
pub type Field<'a> = (&'a str, FieldValue<'a>);

/// Synchronous, unbuffered JSON event logger.
pub struct Logger;

impl Logger {
    /// Emit one event at the given severity.
    pub fn log(severity: Severity, event: &str, fields: &[Field<'_>]) {
        Self::write_event(severity, event, fields, &mut io::stderr());
    }

    fn write_event<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[Field<'_>],
        out: &mut W,
    ) {
        let mut line = String::with_capacity(128);

        line.push_str("{\"event\":\"");
        escape_into(&mut line, event);
        line.push_str("\",\"severity\":\"");
        line.push_str(severity.as_str());
        line.push('"');

        let mut ordered: Vec<Field<'_>> = fields.to_vec();
        ordered.sort_by_key(|&(name, _)| name);

        for (name, value) in ordered {
            line.push_str(",\"");
            escape_into(&mut line, name);
            line.push_str("\":");
            match value {
                FieldValue::Str(text) => {
                    line.push('"');
                    escape_into(&mut line, text);
                    line.push('"');
                }
                FieldValue::Count(n) => {
                    let _ = write!(line, "{}", n);
                }
            }
        }

        line.push_str("}\n");

        // One write_all per event keeps concurrent lines whole.
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }

    /// Log at TRACE level
    pub fn trace(event: &str, fields: &[Field<'_>]) {
        Self::log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[Field<'_>]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[Field<'_>]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[Field<'_>]) {
        Self::log(Severity::Error, event, fields);
    }

    /// Log at FATAL level
    pub fn fatal(event: &str, fields: &[Field<'_>]) {
        Self::log(Severity::Fatal, event, fields);
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
}

/// Render one event to a string instead of stderr, for assertions.
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[Field<'_>]) -> String {
    let mut buffer = Vec::new();
    Logger::write_event(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
