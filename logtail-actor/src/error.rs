//! Error types for the actor layer

use logtail_client::ClientError;
use thiserror::Error;

/// Errors surfaced by the log tailing operations
///
/// Collaborator errors are carried verbatim; only stream diagnostics are
/// synthesized here.
#[derive(Debug, Error)]
pub enum ActorError {
    /// The application could not be resolved; nothing was streamed or fetched
    #[error(transparent)]
    Resolution(ClientError),

    /// A diagnostic reported while walking the log cache
    #[error("{0}")]
    Stream(String),

    /// The recent-logs query failed
    #[error(transparent)]
    RecentFetch(ClientError),
}

impl ActorError {
    /// The collaborator error behind a resolution or recent-fetch failure
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Resolution(e) | Self::RecentFetch(e) => Some(e),
            Self::Stream(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_is_exposed() {
        let error = ActorError::Resolution(ClientError::NotFound("web".to_string()));
        assert!(error.client_error().is_some_and(ClientError::is_not_found));

        let error = ActorError::RecentFetch(ClientError::api_error(503, "down"));
        assert!(error.client_error().is_some_and(ClientError::is_server_error));

        assert!(ActorError::Stream("timeout".to_string()).client_error().is_none());
    }
}
