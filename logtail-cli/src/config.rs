//! Configuration module
//!
//! Holds the service URLs, credentials and target space of the CLI.

use reqwest::Url;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Cloud controller base URL (e.g., "https://api.example.com")
    pub api_url: String,

    /// Log cache base URL (e.g., "https://log-cache.example.com")
    pub log_cache_url: String,

    /// Bearer token sent to both services
    pub access_token: Option<String>,

    /// GUID of the space used to resolve application names
    pub space_guid: String,
}

impl Config {
    /// Creates a configuration, deriving the log cache URL when not given
    pub fn new(
        api_url: String,
        log_cache_url: Option<String>,
        access_token: Option<String>,
        space_guid: String,
    ) -> Self {
        let log_cache_url = log_cache_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| derive_log_cache_url(&api_url));

        Self {
            api_url,
            log_cache_url,
            access_token: access_token.filter(|token| !token.is_empty()),
            space_guid,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        check_url("api_url", &self.api_url)?;
        check_url("log_cache_url", &self.log_cache_url)?;

        if self.space_guid.is_empty() {
            anyhow::bail!("space_guid cannot be empty (use --space or LOGTAIL_SPACE_GUID)");
        }

        Ok(())
    }
}

fn check_url(name: &str, url: &str) -> anyhow::Result<()> {
    if url.is_empty() {
        anyhow::bail!("{} cannot be empty", name);
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", name);
    }

    Ok(())
}

/// Guess the log cache URL from the API URL
///
/// `https://api.sys.example.com` becomes `https://log-cache.sys.example.com`.
/// URLs without a leading `api.` host label are returned unchanged.
pub fn derive_log_cache_url(api_url: &str) -> String {
    let Ok(mut url) = Url::parse(api_url) else {
        return api_url.to_string();
    };

    let Some(domain) = url.host_str().and_then(|host| host.strip_prefix("api.")) else {
        return api_url.to_string();
    };

    let host = format!("log-cache.{}", domain);
    if url.set_host(Some(&host)).is_err() {
        return api_url.to_string();
    }

    url.as_str().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new(
            "https://api.sys.example.com".to_string(),
            None,
            None,
            "space-guid".to_string(),
        )
    }

    #[test]
    fn test_derive_log_cache_url() {
        assert_eq!(
            derive_log_cache_url("https://api.sys.example.com"),
            "https://log-cache.sys.example.com"
        );
        assert_eq!(
            derive_log_cache_url("https://api.example.com:8443/"),
            "https://log-cache.example.com:8443"
        );
        assert_eq!(
            derive_log_cache_url("http://localhost:8080"),
            "http://localhost:8080"
        );
        assert_eq!(derive_log_cache_url("not-a-url"), "not-a-url");
    }

    #[test]
    fn test_explicit_log_cache_url_wins() {
        let config = Config::new(
            "https://api.example.com".to_string(),
            Some("http://localhost:9000".to_string()),
            Some(String::new()),
            "space-guid".to_string(),
        );

        assert_eq!(config.log_cache_url, "http://localhost:9000");
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = config();

        // Valid config should pass
        assert_eq!(config.log_cache_url, "https://log-cache.sys.example.com");
        assert!(config.validate().is_ok());

        // Empty space should fail
        config.space_guid = String::new();
        assert!(config.validate().is_err());

        config.space_guid = "space-guid".to_string();

        // Invalid URLs should fail
        config.api_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.api_url = "https://api.sys.example.com".to_string();
        config.log_cache_url = String::new();
        assert!(config.validate().is_err());

        config.log_cache_url = "http://localhost:8080".to_string();
        assert!(config.validate().is_ok());
    }
}
