//! Cloud controller v3 application lookup

use logtail_core::Warnings;
use logtail_core::domain::application::Application;
use logtail_core::dto::application::ApplicationList;
use percent_encoding::percent_decode_str;
use reqwest::Client;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::{authorize, handle_response, normalize_base_url};

/// Response header carrying comma-separated, URL-encoded warnings
pub const WARNINGS_HEADER: &str = "x-cf-warnings";

/// HTTP client for the cloud controller API
#[derive(Debug, Clone)]
pub struct ControllerClient {
    /// Base URL of the API (e.g., "https://api.example.com")
    base_url: String,
    /// Bearer token sent with every request
    access_token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl ControllerClient {
    /// Create a new cloud controller client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new cloud controller client with a custom HTTP client
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

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up an application by name within a space
    ///
    /// Warnings reported by the API are returned even when the lookup fails.
    ///
    /// # Arguments
    /// * `name` - The application name
    /// * `space_guid` - The GUID of the space to search
    ///
    /// # Errors
    /// Returns [`ClientError::NotFound`] when no application matches.
    pub async fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> (Result<Application>, Warnings) {
        let url = format!("{}/v3/apps", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("names", name), ("space_guids", space_guid)]);

        debug!(app = name, space_guid, "Resolving application");

        let response = match authorize(request, self.access_token.as_deref()).send().await {
            Ok(response) => response,
            Err(e) => return (Err(e.into()), Warnings::new()),
        };

        let warnings = decode_warnings(response.headers());
        let result = handle_response::<ApplicationList>(response)
            .await
            .and_then(|list| {
                list.resources.into_iter().next().ok_or_else(|| {
                    ClientError::NotFound(format!("Application '{}' not found", name))
                })
            });

        (result, warnings)
    }
}

/// Decode every warning carried by the response headers
///
/// Each header value is a comma-separated list of form-encoded warnings.
pub fn decode_warnings(headers: &HeaderMap) -> Warnings {
    headers
        .get_all(WARNINGS_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|warning| !warning.is_empty())
        .map(decode_warning)
        .collect()
}

/// Form-decode a single warning: `+` is a space, `%XX` an escaped byte
fn decode_warning(encoded: &str) -> String {
    percent_decode_str(&encoded.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}
