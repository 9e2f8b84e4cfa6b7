//! Log-cache read endpoint

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logtail_core::domain::envelope::{Envelope, EnvelopeType};
use logtail_core::dto::envelope::ReadResponse;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::Result;
use crate::{authorize, handle_response, normalize_base_url};

/// Source of log-cache envelopes
///
/// This is the read primitive the [`walk`](crate::walk::walk) driver pages
/// through. It is a trait so tests can substitute scripted readers.
#[async_trait]
pub trait LogCacheReader: Send + Sync {
    /// Read envelopes for `source_id` starting at `start` (inclusive)
    ///
    /// # Arguments
    /// * `source_id` - The source to read, usually an application GUID
    /// * `start` - Oldest envelope timestamp to return
    /// * `options` - Filters, limits and ordering
    async fn read(
        &self,
        source_id: &str,
        start: DateTime<Utc>,
        options: &ReadOptions,
    ) -> Result<Vec<Envelope>>;
}

/// Optional parameters of a log-cache read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Newest envelope timestamp to return (exclusive)
    pub end_time: Option<DateTime<Utc>>,
    /// Maximum number of envelopes to return
    pub limit: Option<usize>,
    /// Only return these envelope types (all types when empty)
    pub envelope_types: Vec<EnvelopeType>,
    /// Return newest envelopes first
    pub descending: bool,
}

impl ReadOptions {
    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_envelope_types(mut self, types: impl IntoIterator<Item = EnvelopeType>) -> Self {
        self.envelope_types = types.into_iter().collect();
        self
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    /// Render the options as query parameters for a read starting at `start`
    pub fn query_params(&self, start: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let mut params = vec![("start_time", unix_nanos(start).to_string())];

        if let Some(end_time) = self.end_time {
            params.push(("end_time", unix_nanos(end_time).to_string()));
        }

        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }

        for envelope_type in &self.envelope_types {
            params.push(("envelope_types", envelope_type.as_str_name().to_string()));
        }

        if self.descending {
            params.push(("descending", "true".to_string()));
        }

        params
    }
}

/// Nanoseconds since the epoch, clamped to the representable range
pub(crate) fn unix_nanos(time: DateTime<Utc>) -> i64 {
    time.timestamp_nanos_opt()
        .unwrap_or(if time.timestamp() < 0 { 0 } else { i64::MAX })
}

/// HTTP client for the log-cache API
#[derive(Debug, Clone)]
pub struct LogCacheClient {
    /// Base URL of the log cache (e.g., "https://log-cache.example.com")
    base_url: String,
    /// Bearer token sent with every request
    access_token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl LogCacheClient {
    /// Create a new log-cache client
    ///
    /// # Example
    /// ```
    /// use logtail_client::LogCacheClient;
    ///
    /// let client = LogCacheClient::new("https://log-cache.example.com/");
    /// assert_eq!(client.base_url(), "https://log-cache.example.com");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new log-cache client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            access_token: None,
            client,
        }
    }

    /// Send `token` as a bearer token with every request
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Get the base URL of the log cache
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the read endpoint for a source
    pub fn read_url(&self, source_id: &str) -> String {
        format!("{}/api/v1/read/{}", self.base_url, source_id)
    }
}

#[async_trait]
impl LogCacheReader for LogCacheClient {
    async fn read(
        &self,
        source_id: &str,
        start: DateTime<Utc>,
        options: &ReadOptions,
    ) -> Result<Vec<Envelope>> {
        let url = self.read_url(source_id);
        let params = options.query_params(start);

        debug!(source_id, start = %start, "Reading from log cache");

        let request = self.client.get(&url).query(&params);
        let response = authorize(request, self.access_token.as_deref())
            .send()
            .await?;

        let body: ReadResponse = handle_response(response).await?;
        let (envelopes, rejected) = body.into_envelopes();

        for envelope in &rejected {
            warn!(
                source_id,
                timestamp = envelope.timestamp,
                error = %envelope.error,
                "Skipping undecodable envelope"
            );
        }

        Ok(envelopes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = LogCacheClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.read_url("app-guid"),
            "http://localhost:8080/api/v1/read/app-guid"
        );
    }

    #[test]
    fn test_default_query_params() {
        let start = DateTime::from_timestamp_nanos(42);
        let params = ReadOptions::default().query_params(start);
        assert_eq!(params, vec![("start_time", "42".to_string())]);
    }

    #[test]
    fn test_full_query_params() {
        let start = DateTime::from_timestamp_nanos(1_000);
        let options = ReadOptions::default()
            .with_end_time(DateTime::from_timestamp_nanos(2_000))
            .with_limit(1000)
            .with_envelope_types([EnvelopeType::Log, EnvelopeType::Gauge])
            .descending();

        let params = options.query_params(start);

        assert_eq!(
            params,
            vec![
                ("start_time", "1000".to_string()),
                ("end_time", "2000".to_string()),
                ("limit", "1000".to_string()),
                ("envelope_types", "LOG".to_string()),
                ("envelope_types", "GAUGE".to_string()),
                ("descending", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_unix_nanos_clamps() {
        assert_eq!(unix_nanos(DateTime::<Utc>::UNIX_EPOCH), 0);
        assert_eq!(unix_nanos(DateTime::<Utc>::MAX_UTC), i64::MAX);
        assert_eq!(unix_nanos(DateTime::<Utc>::MIN_UTC), 0);
    }
}
