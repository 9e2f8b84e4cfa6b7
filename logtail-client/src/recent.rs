//! Recent-logs query

use chrono::{DateTime, Utc};
use logtail_core::convert::convert_envelope;
use logtail_core::domain::envelope::EnvelopeType;
use logtail_core::dto::log::RecentLogMessage;

use crate::LogCacheClient;
use crate::error::Result;
use crate::log_cache::{LogCacheReader, ReadOptions};

/// Maximum number of envelopes requested by a recent-logs query
pub const RECENT_LOGS_LIMIT: usize = 1000;

/// Fetch the most recent log lines of a source, oldest first
///
/// Reads the newest [`RECENT_LOGS_LIMIT`] log envelopes in descending order
/// and reverses them, so the result ends with the latest line.
pub async fn recent_logs<R>(reader: &R, source_id: &str) -> Result<Vec<RecentLogMessage>>
where
    R: LogCacheReader + ?Sized,
{
    let options = ReadOptions::default()
        .with_envelope_types([EnvelopeType::Log])
        .with_limit(RECENT_LOGS_LIMIT)
        .descending();

    let envelopes = reader
        .read(source_id, DateTime::<Utc>::UNIX_EPOCH, &options)
        .await?;

    Ok(envelopes
        .iter()
        .rev()
        .filter_map(convert_envelope)
        .map(|message| RecentLogMessage::from(&message))
        .collect())
}

impl LogCacheClient {
    /// Fetch the most recent log lines of an application, oldest first
    ///
    /// # Arguments
    /// * `source_id` - The application GUID
    pub async fn recent_logs(&self, source_id: &str) -> Result<Vec<RecentLogMessage>> {
        recent_logs(self, source_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use logtail_core::domain::envelope::{Envelope, EnvelopeMessage, Log, LogType};
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::ClientError;

    struct DescendingReader {
        envelopes: Vec<Envelope>,
        seen_options: Mutex<Option<ReadOptions>>,
    }

    #[async_trait]
    impl LogCacheReader for DescendingReader {
        async fn read(
            &self,
            _source_id: &str,
            _start: DateTime<Utc>,
            options: &ReadOptions,
        ) -> Result<Vec<Envelope>> {
            *self.seen_options.lock().unwrap() = Some(options.clone());
            Ok(self.envelopes.clone())
        }
    }

    struct FailingReader;

    #[async_trait]
    impl LogCacheReader for FailingReader {
        async fn read(
            &self,
            _source_id: &str,
            _start: DateTime<Utc>,
            _options: &ReadOptions,
        ) -> Result<Vec<Envelope>> {
            Err(ClientError::api_error(500, "boom"))
        }
    }

    fn envelope(timestamp: i64, message: Option<EnvelopeMessage>) -> Envelope {
        Envelope {
            timestamp,
            source_id: "app".to_string(),
            instance_id: "2".to_string(),
            tags: HashMap::from([("source_type".to_string(), "APP/PROC/WEB".to_string())]),
            message,
        }
    }

    fn log(text: &str) -> Option<EnvelopeMessage> {
        Some(EnvelopeMessage::Log(Log {
            payload: text.as_bytes().to_vec(),
            log_type: LogType::Out,
        }))
    }

    #[tokio::test]
    async fn test_recent_logs_are_reversed_and_filtered() {
        let reader = DescendingReader {
            envelopes: vec![
                envelope(3, log("third")),
                envelope(2, Some(EnvelopeMessage::Counter)),
                envelope(2, log("second")),
                envelope(1, log("first")),
            ],
            seen_options: Mutex::new(None),
        };

        let messages = recent_logs(&reader, "app").await.unwrap();

        let texts: Vec<&str> = messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(messages[0].source_type, "APP/PROC/WEB");
        assert_eq!(messages[0].source_instance, "2");
        assert_eq!(messages[0].timestamp, DateTime::from_timestamp_nanos(1));

        let options = reader.seen_options.lock().unwrap().clone().unwrap();
        assert_eq!(options.limit, Some(RECENT_LOGS_LIMIT));
        assert_eq!(options.envelope_types, vec![EnvelopeType::Log]);
        assert!(options.descending);
    }

    #[tokio::test]
    async fn test_recent_logs_propagates_errors() {
        let result = recent_logs(&FailingReader, "app").await;
        assert!(matches!(result, Err(ClientError::ApiError { status: 500, .. })));
    }
}
