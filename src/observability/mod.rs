//! Observability subsystem for cinderdb
//!
//! Structured JSON event logging for an embedded engine. One log line is
//! one event, written synchronously to stderr; stdout stays free for the
//! embedding process.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No async or background threads
//! 4. Deterministic output (alphabetical field ordering)

mod logger;

pub use logger::{Field, FieldValue, Logger, Severity};
