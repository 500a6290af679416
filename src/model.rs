//! Core data types for the logs API.
//!
//! This module defines the log record entity and the input shapes used for
//! creation and partial update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a log record.
///
/// Ids are assigned by the store at insert time, are monotonically
/// increasing, and are never reused after deletion.
pub type LogId = i64;

/// Severity classification of a log record.
///
/// This is a closed set: exactly five levels, ordered from least to most
/// severe. The derived `Ord` follows the declared order, which is also the
/// order the histogram view enumerates buckets in.
///
/// Serializes to and from the literal strings `DEBUG`, `INFO`, `WARNING`,
/// `ERROR`, `CRITICAL`; any other string is rejected at the deserialization
/// boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// All severity levels in declared (display) order.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// The wire string for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored log record.
///
/// `id` and `timestamp` defaults are resolved by the store at insert time;
/// all other fields come from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Store-assigned identifier. Immutable for the record's lifetime.
    pub id: LogId,
    /// Event time. Defaults to insert time when the client omits it.
    /// Not required to be monotonic relative to insertion order.
    pub timestamp: DateTime<Utc>,
    /// Log message text, 1-5000 characters.
    pub message: String,
    /// Severity level.
    pub severity: Severity,
    /// Originating service or component, 2-255 characters.
    pub source: String,
}

/// Validated input for creating a log record.
///
/// Produced by [`validate_create`](crate::validate::validate_create); the
/// store assigns the id and resolves a missing timestamp to "now".
#[derive(Debug, Clone)]
pub struct NewLog {
    pub message: String,
    pub severity: Severity,
    pub source: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Partial update for a log record.
///
/// Every field is optional; absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct LogPatch {
    pub message: Option<String>,
    pub severity: Option<Severity>,
    pub source: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl LogPatch {
    /// True when no field is present, i.e. the update is a no-op.
    pub fn is_empty(&self) -> bool {
        self.message.is_none()
            && self.severity.is_none()
            && self.source.is_none()
            && self.timestamp.is_none()
    }
}
