//! Log domain types

use chrono::{DateTime, Utc};

/// Source type tag carried by logs emitted while an application is staging
pub const STAGING_LOG: &str = "STG";

/// A normalized log line for an application
///
/// Built once from a log-cache envelope (streaming) or a recent-log DTO
/// (batch) and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    message: String,
    message_type: String,
    timestamp: DateTime<Utc>,
    source_type: String,
    source_instance: String,
}

impl LogMessage {
    pub fn new(
        message: impl Into<String>,
        message_type: impl Into<String>,
        timestamp: DateTime<Utc>,
        source_type: impl Into<String>,
        source_instance: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            message_type: message_type.into(),
            timestamp,
            source_type: source_type.into(),
            source_instance: source_instance.into(),
        }
    }

    /// Log line body
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Transport log type, e.g. "OUT" or "ERR"
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Origin subsystem, e.g. "APP/PROC/WEB", "STG", "API"
    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    pub fn source_instance(&self) -> &str {
        &self.source_instance
    }

    /// Whether this line was emitted during staging
    pub fn staging(&self) -> bool {
        self.source_type == STAGING_LOG
    }
}

/// Sort messages by timestamp, oldest first
///
/// The sort is stable: messages sharing a timestamp keep their relative order.
pub fn sort_chronologically(messages: &mut [LogMessage]) {
    messages.sort_by_key(|message| message.timestamp);
}
