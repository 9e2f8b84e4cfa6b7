//! One-shot recent logs

use async_trait::async_trait;
use logtail_client::{ClientError, LogCacheClient};
use logtail_core::domain::log::{LogMessage, sort_chronologically};
use logtail_core::dto::log::RecentLogMessage;
use tracing::debug;

use crate::error::ActorError;

/// Source of the recent-logs query
#[async_trait]
pub trait RecentLogSource: Send + Sync {
    /// Fetch the most recent log lines of an application
    async fn recent_logs(&self, source_id: &str) -> Result<Vec<RecentLogMessage>, ClientError>;
}

#[async_trait]
impl RecentLogSource for LogCacheClient {
    async fn recent_logs(&self, source_id: &str) -> Result<Vec<RecentLogMessage>, ClientError> {
        LogCacheClient::recent_logs(self, source_id).await
    }
}

/// Ordering applied to a recent-logs batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecentLogOrder {
    /// Keep the order returned by the source
    #[default]
    AsReturned,
    /// Stable sort by timestamp, oldest first
    Chronological,
}

/// Fetches a finite batch of recent log messages
pub struct RecentLogFetcher<'a, S: ?Sized> {
    source: &'a S,
    order: RecentLogOrder,
}

impl<'a, S> RecentLogFetcher<'a, S>
where
    S: RecentLogSource + ?Sized,
{
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            order: RecentLogOrder::default(),
        }
    }

    pub fn with_order(mut self, order: RecentLogOrder) -> Self {
        self.order = order;
        self
    }

    /// Fetch the recent messages of an application
    ///
    /// Timestamps are taken from the source as-is. Errors are returned
    /// without partial results.
    pub async fn fetch(&self, app_guid: &str) -> Result<Vec<LogMessage>, ActorError> {
        let batch = self
            .source
            .recent_logs(app_guid)
            .await
            .map_err(ActorError::RecentFetch)?;

        let mut messages: Vec<LogMessage> = batch.into_iter().map(LogMessage::from).collect();
        if self.order == RecentLogOrder::Chronological {
            sort_chronologically(&mut messages);
        }

        debug!(app_guid, count = messages.len(), "Fetched recent logs");
        Ok(messages)
    }
}
