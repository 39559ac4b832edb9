//! Output handling: log entries, sinks, and job statistics

pub mod entry;
pub mod sinks;
pub mod stats;

pub use entry::{is_beta, Diagnostic, DiagnosticKind, LogEntry, TAB};
pub use sinks::LogSinks;
pub use stats::JobStats;
