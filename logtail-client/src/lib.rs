//! Logtail HTTP Clients
//!
//! Type-safe HTTP clients for the two services the log tailer talks to:
//!
//! - [`LogCacheClient`]: reads envelopes from the log cache and answers
//!   recent-log queries
//! - [`ControllerClient`]: resolves application names through the cloud
//!   controller v3 API
//!
//! It also provides the [`walk`](walk::walk) driver, which pages through the
//! log cache continuously with a pluggable [`Backoff`](walk::Backoff) policy.
//!
//! # Example
//!
//! ```no_run
//! use logtail_client::{LogCacheClient, LogCacheReader, ReadOptions};
//! use logtail_core::domain::envelope::EnvelopeType;
//!
//! #[tokio::main]
//! async fn main() -> logtail_client::Result<()> {
//!     let client = LogCacheClient::new("http://log-cache.example.com");
//!
//!     let options = ReadOptions::default().with_envelope_types([EnvelopeType::Log]);
//!     let envelopes = client.read("app-guid", chrono::Utc::now(), &options).await?;
//!
//!     println!("Read {} envelope(s)", envelopes.len());
//!     Ok(())
//! }
//! ```

mod controller;
pub mod error;
mod log_cache;
mod recent;
pub mod walk;

// Re-export commonly used types
pub use controller::{ControllerClient, WARNINGS_HEADER, decode_warnings};
pub use error::{ClientError, Result};
pub use log_cache::{LogCacheClient, LogCacheReader, ReadOptions};
pub use recent::RECENT_LOGS_LIMIT;

use serde::de::DeserializeOwned;

/// Attach a bearer token to a request when one is configured
fn authorize(request: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Handle an API response and deserialize JSON
///
/// This checks the status code and returns an appropriate error if the
/// request failed, or deserializes the response body if successful.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

/// Strip trailing slashes so endpoint paths can be appended verbatim
fn normalize_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://localhost:8080/"), "http://localhost:8080");
        assert_eq!(normalize_base_url("http://localhost:8080//"), "http://localhost:8080");
        assert_eq!(normalize_base_url("http://localhost:8080"), "http://localhost:8080");
    }
}
