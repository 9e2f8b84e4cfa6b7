//! Log DTOs

use chrono::{DateTime, Utc};

use crate::domain::log::LogMessage;

/// A log line returned by the recent-logs query
///
/// Timestamps are already resolved; consumers must not reinterpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentLogMessage {
    pub message: String,
    pub message_type: String,
    pub timestamp: DateTime<Utc>,
    pub source_type: String,
    pub source_instance: String,
}

impl From<RecentLogMessage> for LogMessage {
    fn from(dto: RecentLogMessage) -> Self {
        LogMessage::new(
            dto.message,
            dto.message_type,
            dto.timestamp,
            dto.source_type,
            dto.source_instance,
        )
    }
}

impl From<&LogMessage> for RecentLogMessage {
    fn from(message: &LogMessage) -> Self {
        Self {
            message: message.message().to_string(),
            message_type: message.message_type().to_string(),
            timestamp: message.timestamp(),
            source_type: message.source_type().to_string(),
            source_instance: message.source_instance().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_log_conversion_keeps_timestamp() {
        let timestamp = DateTime::from_timestamp_nanos(1_600_000_000_000_000_001);
        let dto = RecentLogMessage {
            message: "staged".to_string(),
            message_type: "OUT".to_string(),
            timestamp,
            source_type: "STG".to_string(),
            source_instance: "0".to_string(),
        };

        let message: LogMessage = dto.into();
        assert_eq!(message.message(), "staged");
        assert_eq!(message.timestamp(), timestamp);
        assert!(message.staging());
    }
}
