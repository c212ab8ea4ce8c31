//! Run log and trace id.
//!
//! Every entry appended to a [`RunLog`] is also emitted through `tracing`
//! so a run can be followed in the server logs by its trace id.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Short correlation id stamped on one run's log entries and events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// Length of a generated id.
    pub const LEN: usize = 8;

    /// Generate a fresh id from a random UUID. Uniqueness is not enforced.
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(Self::LEN);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Severity of a run log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One structured line of a run's log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub trace_id: Option<TraceId>,
    pub message: String,
    pub data: serde_json::Value,
}

/// Append-only, ordered log owned by a single run.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and echo it to `tracing`.
    pub fn record(
        &mut self,
        level: LogLevel,
        trace_id: Option<&TraceId>,
        message: impl Into<String>,
        data: serde_json::Value,
    ) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            trace_id: trace_id.cloned(),
            message: message.into(),
            data,
        };

        let trace = entry.trace_id.as_ref().map(TraceId::as_str).unwrap_or("-");
        match level {
            LogLevel::Info => {
                tracing::info!(trace_id = trace, data = %entry.data, "{}", entry.message)
            }
            LogLevel::Warn => {
                tracing::warn!(trace_id = trace, data = %entry.data, "{}", entry.message)
            }
            LogLevel::Error => {
                tracing::error!(trace_id = trace, data = %entry.data, "{}", entry.message)
            }
        }

        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_id_shape() {
        let id = TraceId::generate();
        assert_eq!(id.as_str().len(), TraceId::LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_record_preserves_order_and_trace() {
        let trace = TraceId::generate();
        let mut log = RunLog::new();
        log.record(LogLevel::Info, Some(&trace), "first", json!({}));
        log.record(LogLevel::Warn, Some(&trace), "second", json!({"n": 2}));

        let messages: Vec<_> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);
        assert!(log.entries().iter().all(|e| e.trace_id.as_ref() == Some(&trace)));
        assert_eq!(log.entries()[1].data["n"], 2);
    }

    #[test]
    fn test_level_wire_format() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Warn,
            trace_id: None,
            message: "m".into(),
            data: json!({}),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["level"], "WARN");
        assert!(value["trace_id"].is_null());
    }
}
