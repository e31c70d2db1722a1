//! Structured JSON logging for scoring attempts.

mod format;

pub use format::{LogEvent, StructuredLogger};
