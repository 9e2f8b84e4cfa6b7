//! Walk diagnostics to error channel bridge

use async_trait::async_trait;
use logtail_client::ClientError;
use logtail_client::walk::WalkObserver;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ActorError;

/// Delivers every failed read of a walk as an [`ActorError::Stream`]
///
/// Delivery waits for room on the bounded channel but gives up once the
/// stream is cancelled or the receiver is gone.
#[derive(Debug, Clone)]
pub struct ErrorSink {
    errors: mpsc::Sender<ActorError>,
    cancel: CancellationToken,
}

impl ErrorSink {
    pub fn new(errors: mpsc::Sender<ActorError>, cancel: CancellationToken) -> Self {
        Self { errors, cancel }
    }

    /// Deliver a diagnostic line, trimming trailing newlines
    pub async fn report(&self, diagnostic: impl AsRef<str>) {
        let error = ActorError::Stream(diagnostic.as_ref().trim_end_matches('\n').to_string());

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Dropping stream diagnostic after cancellation");
            }
            sent = self.errors.send(error) => {
                if sent.is_err() {
                    debug!("Error receiver dropped, discarding stream diagnostic");
                }
            }
        }
    }
}

#[async_trait]
impl WalkObserver for ErrorSink {
    async fn on_read_error(&mut self, error: &ClientError) {
        self.report(error.to_string()).await;
    }
}
