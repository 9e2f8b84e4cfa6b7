//! Continuous log streaming
//!
//! A [`StreamPump`] spawns one producer task per stream. The task walks the
//! log cache, converts each batch into log messages and pushes them one at a
//! time onto a bounded channel. Read failures are retried by the walk's
//! backoff policy and reported on a second bounded channel through an
//! [`ErrorSink`]. When the walk ends, the task drops both senders, so the
//! consumer sees both channels close.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use logtail_client::LogCacheReader;
use logtail_client::walk::{AlwaysRetryBackoff, Backoff, Visitor, WalkOptions, walk};
use logtail_core::convert::convert_envelopes;
use logtail_core::domain::envelope::{Envelope, EnvelopeType};
use logtail_core::domain::log::LogMessage;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::ActorError;
use crate::error_sink::ErrorSink;

/// Capacity of the message and error channels
pub const STREAM_BUFFER_SIZE: usize = 1000;

/// How far back a new stream starts reading
pub const STREAM_LOOKBACK: Duration = Duration::from_secs(5);

/// Wait between retries of a failed or empty read
pub const RETRY_INTERVAL: Duration = Duration::from_millis(250);

/// Receiving end of a log stream
///
/// Both channels close once the producer stops. Cancelling the token stops
/// the producer before its next push.
#[derive(Debug)]
pub struct LogStream {
    pub messages: mpsc::Receiver<LogMessage>,
    pub errors: mpsc::Receiver<ActorError>,
    pub cancel: CancellationToken,
}

impl LogStream {
    pub fn into_parts(
        self,
    ) -> (
        mpsc::Receiver<LogMessage>,
        mpsc::Receiver<ActorError>,
        CancellationToken,
    ) {
        (self.messages, self.errors, self.cancel)
    }
}

/// Builder for a log stream over a log-cache reader
pub struct StreamPump<R: ?Sized> {
    reader: Arc<R>,
    lookback: Duration,
    buffer_size: usize,
    backoff: Box<dyn Backoff>,
}

impl<R> StreamPump<R>
where
    R: LogCacheReader + ?Sized + 'static,
{
    /// Create a pump that retries forever every [`RETRY_INTERVAL`]
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            reader,
            lookback: STREAM_LOOKBACK,
            buffer_size: STREAM_BUFFER_SIZE,
            backoff: Box::new(AlwaysRetryBackoff::new(RETRY_INTERVAL)),
        }
    }

    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Replace the retry policy of the underlying walk
    pub fn with_backoff(mut self, backoff: impl Backoff + 'static) -> Self {
        self.backoff = Box::new(backoff);
        self
    }

    /// Spawn the producer task and return the stream immediately
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self, app_guid: &str) -> LogStream {
        info!(app_guid, "Start tailing logs");

        let (message_tx, message_rx) = mpsc::channel(self.buffer_size);
        let (error_tx, error_rx) = mpsc::channel(self.buffer_size);
        let cancel = CancellationToken::new();

        let start_time = Utc::now()
            - chrono::Duration::from_std(self.lookback).unwrap_or(chrono::Duration::zero());

        let options = WalkOptions::default()
            .with_start_time(start_time)
            .with_envelope_types([EnvelopeType::Log])
            .with_backoff(self.backoff)
            .with_observer(ErrorSink::new(error_tx, cancel.clone()));

        let mut pump = MessagePump {
            messages: message_tx,
            cancel: cancel.clone(),
        };
        let reader = self.reader;
        let source_id = app_guid.to_string();
        let token = cancel.clone();

        tokio::spawn(async move {
            let outcome = walk(&source_id, &mut pump, reader.as_ref(), options, &token).await;
            debug!(app_guid = %source_id, outcome = ?outcome, "Stopped tailing logs");
        });

        LogStream {
            messages: message_rx,
            errors: error_rx,
            cancel,
        }
    }
}

/// Start streaming the logs of an application
///
/// Reads start five seconds in the past, failed reads are retried every
/// 250ms until the stream is cancelled.
///
/// # Arguments
/// * `app_guid` - The application GUID (log-cache source id)
/// * `reader` - The log-cache read primitive
pub fn get_streaming_logs<R>(app_guid: &str, reader: Arc<R>) -> LogStream
where
    R: LogCacheReader + ?Sized + 'static,
{
    StreamPump::new(reader).start(app_guid)
}

/// Visitor that forwards converted messages to the outbound channel
struct MessagePump {
    messages: mpsc::Sender<LogMessage>,
    cancel: CancellationToken,
}

#[async_trait]
impl Visitor for MessagePump {
    async fn visit(&mut self, envelopes: Vec<Envelope>) -> bool {
        for message in convert_envelopes(&envelopes) {
            if self.cancel.is_cancelled() {
                return false;
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return false,
                sent = self.messages.send(message) => {
                    if sent.is_err() {
                        debug!("Message receiver dropped, stopping stream");
                        return false;
                    }
                }
            }
        }

        true
    }
}
