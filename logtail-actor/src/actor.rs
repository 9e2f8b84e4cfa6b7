//! Name-based entry points
//!
//! Users address applications by name within a space, while the log cache
//! is keyed by application GUID. [`Actor`] resolves the name first and only
//! then starts a stream or fetches recent logs. Warnings gathered during
//! resolution are returned on every path.

use std::sync::Arc;

use async_trait::async_trait;
use logtail_client::{ClientError, ControllerClient, LogCacheReader};
use logtail_core::Warnings;
use logtail_core::domain::application::Application;
use logtail_core::domain::log::LogMessage;
use tracing::debug;

use crate::error::ActorError;
use crate::recent::{RecentLogFetcher, RecentLogOrder, RecentLogSource};
use crate::streaming::{LogStream, get_streaming_logs};

/// Result of a name-based operation together with the resolution warnings
pub type ActorResult<T> = (Result<T, ActorError>, Warnings);

/// Resolves an application name within a space
#[async_trait]
pub trait ApplicationResolver: Send + Sync {
    async fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> (Result<Application, ClientError>, Warnings);
}

#[async_trait]
impl ApplicationResolver for ControllerClient {
    async fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> (Result<Application, ClientError>, Warnings) {
        ControllerClient::get_application_by_name_and_space(self, name, space_guid).await
    }
}

/// Log tailing operations addressed by application name
pub struct Actor<R> {
    resolver: R,
    recent_order: RecentLogOrder,
}

impl<R: ApplicationResolver> Actor<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            recent_order: RecentLogOrder::default(),
        }
    }

    /// Order applied to recent-logs batches
    pub fn with_recent_order(mut self, order: RecentLogOrder) -> Self {
        self.recent_order = order;
        self
    }

    /// Resolve `name` and start streaming its logs
    ///
    /// Nothing is streamed when resolution fails.
    pub async fn get_streaming_logs_for_application_by_name_and_space<L>(
        &self,
        name: &str,
        space_guid: &str,
        reader: Arc<L>,
    ) -> ActorResult<LogStream>
    where
        L: LogCacheReader + ?Sized + 'static,
    {
        let (app, warnings) = self.resolve(name, space_guid).await;
        let result = app.map(|app| get_streaming_logs(&app.guid, reader));
        (result, warnings)
    }

    /// Resolve `name` and fetch its recent logs
    ///
    /// Nothing is fetched when resolution fails.
    pub async fn get_recent_logs_for_application_by_name_and_space<S>(
        &self,
        name: &str,
        space_guid: &str,
        source: &S,
    ) -> ActorResult<Vec<LogMessage>>
    where
        S: RecentLogSource + ?Sized,
    {
        let (app, warnings) = self.resolve(name, space_guid).await;
        let app = match app {
            Ok(app) => app,
            Err(e) => return (Err(e), warnings),
        };

        let result = RecentLogFetcher::new(source)
            .with_order(self.recent_order)
            .fetch(&app.guid)
            .await;
        (result, warnings)
    }

    async fn resolve(&self, name: &str, space_guid: &str) -> ActorResult<Application> {
        let (result, warnings) = self
            .resolver
            .get_application_by_name_and_space(name, space_guid)
            .await;

        match result {
            Ok(app) => {
                debug!(app = name, guid = %app.guid, "Resolved application");
                (Ok(app), warnings)
            }
            Err(e) => {
                debug!(app = name, space_guid, error = %e, "Failed to resolve application");
                (Err(ActorError::Resolution(e)), warnings)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use logtail_client::ReadOptions;
    use logtail_core::domain::envelope::{Envelope, EnvelopeMessage, Log, LogType};
    use logtail_core::dto::log::RecentLogMessage;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubResolver {
        found: bool,
    }

    #[async_trait]
    impl ApplicationResolver for StubResolver {
        async fn get_application_by_name_and_space(
            &self,
            name: &str,
            _space_guid: &str,
        ) -> (Result<Application, ClientError>, Warnings) {
            let warnings = vec!["deprecated endpoint".to_string()];
            if !self.found {
                return (
                    Err(ClientError::NotFound(format!(
                        "Application '{}' not found",
                        name
                    ))),
                    warnings,
                );
            }

            let app = Application {
                guid: "app-guid".to_string(),
                name: name.to_string(),
                state: "STARTED".to_string(),
            };
            (Ok(app), warnings)
        }
    }

    /// Hands out a single log envelope, then empty batches
    #[derive(Default)]
    struct CountingReader {
        reads: AtomicUsize,
        sources: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LogCacheReader for CountingReader {
        async fn read(
            &self,
            source_id: &str,
            _start: DateTime<Utc>,
            _options: &ReadOptions,
        ) -> logtail_client::Result<Vec<Envelope>> {
            self.sources.lock().unwrap().push(source_id.to_string());
            if self.reads.fetch_add(1, Ordering::SeqCst) > 0 {
                return Ok(Vec::new());
            }

            Ok(vec![Envelope {
                timestamp: 1,
                source_id: source_id.to_string(),
                instance_id: "0".to_string(),
                tags: HashMap::new(),
                message: Some(EnvelopeMessage::Log(Log {
                    payload: b"hello".to_vec(),
                    log_type: LogType::Out,
                })),
            }])
        }
    }

    #[derive(Default)]
    struct CountingSource {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RecentLogSource for CountingSource {
        async fn recent_logs(
            &self,
            source_id: &str,
        ) -> Result<Vec<RecentLogMessage>, ClientError> {
            self.calls.lock().unwrap().push(source_id.to_string());
            Ok([2, 1]
                .into_iter()
                .map(|nanos| RecentLogMessage {
                    message: format!("line {}", nanos),
                    message_type: "OUT".to_string(),
                    timestamp: DateTime::from_timestamp_nanos(nanos),
                    source_type: "APP/PROC/WEB".to_string(),
                    source_instance: "0".to_string(),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_streaming_short_circuits_on_resolution_failure() {
        let actor = Actor::new(StubResolver { found: false });
        let reader = Arc::new(CountingReader::default());

        let (result, warnings) = actor
            .get_streaming_logs_for_application_by_name_and_space("web", "space", reader.clone())
            .await;

        let error = result.unwrap_err();
        assert!(matches!(error, ActorError::Resolution(_)));
        assert_eq!(error.to_string(), "Resource not found: Application 'web' not found");
        assert_eq!(warnings, vec!["deprecated endpoint".to_string()]);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(reader.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_recent_short_circuits_on_resolution_failure() {
        let actor = Actor::new(StubResolver { found: false });
        let source = CountingSource::default();

        let (result, warnings) = actor
            .get_recent_logs_for_application_by_name_and_space("web", "space", &source)
            .await;

        assert!(matches!(result, Err(ActorError::Resolution(_))));
        assert_eq!(warnings.len(), 1);
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_streaming_uses_resolved_guid() {
        let actor = Actor::new(StubResolver { found: true });
        let reader = Arc::new(CountingReader::default());

        let (result, warnings) = actor
            .get_streaming_logs_for_application_by_name_and_space("web", "space", reader.clone())
            .await;
        let mut stream = result.unwrap();
        assert_eq!(warnings, vec!["deprecated endpoint".to_string()]);

        let message = tokio::time::timeout(Duration::from_secs(5), stream.messages.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(message.message(), "hello");

        stream.cancel.cancel();
        let closed = tokio::time::timeout(Duration::from_secs(5), stream.messages.recv())
            .await
            .unwrap();
        assert!(closed.is_none());
        assert_eq!(reader.sources.lock().unwrap()[0], "app-guid");
    }

    #[tokio::test]
    async fn test_recent_uses_resolved_guid_and_order() {
        let actor = Actor::new(StubResolver { found: true })
            .with_recent_order(RecentLogOrder::Chronological);
        let source = CountingSource::default();

        let (result, warnings) = actor
            .get_recent_logs_for_application_by_name_and_space("web", "space", &source)
            .await;

        let texts: Vec<String> = result
            .unwrap()
            .iter()
            .map(|m| m.message().to_string())
            .collect();
        assert_eq!(texts, vec!["line 1", "line 2"]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(*source.calls.lock().unwrap(), vec!["app-guid".to_string()]);
    }
}
