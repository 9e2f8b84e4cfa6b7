//! Log-cache walk driver
//!
//! A walk pages through a source from a start time forward, handing every
//! non-empty batch to a [`Visitor`]. After each batch the next read starts
//! one nanosecond past the newest envelope seen. Failed reads and empty
//! batches are handed to a [`Backoff`] policy, which decides whether the walk
//! keeps going.
//!
//! Cancellation is observed before every read, while a read is in flight and
//! while the backoff policy is waiting.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logtail_core::domain::envelope::{Envelope, EnvelopeType};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::log_cache::{LogCacheReader, ReadOptions, unix_nanos};

/// Receives each non-empty batch read by a walk
#[async_trait]
pub trait Visitor: Send {
    /// Handle a batch; return `false` to stop the walk
    async fn visit(&mut self, envelopes: Vec<Envelope>) -> bool;
}

/// Retry policy of a walk
#[async_trait]
pub trait Backoff: Send {
    /// Called after a failed read; return `false` to stop the walk
    async fn on_err(&mut self, error: &ClientError) -> bool;

    /// Called after a read returned no envelopes; return `false` to stop the walk
    async fn on_empty(&mut self) -> bool;

    /// Called after a read returned envelopes
    fn reset(&mut self);
}

#[async_trait]
impl<B: Backoff + ?Sized> Backoff for Box<B> {
    async fn on_err(&mut self, error: &ClientError) -> bool {
        (**self).on_err(error).await
    }

    async fn on_empty(&mut self) -> bool {
        (**self).on_empty().await
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Receives diagnostics produced while walking
#[async_trait]
pub trait WalkObserver: Send {
    /// Called for every failed read, before the backoff policy runs
    async fn on_read_error(&mut self, error: &ClientError);
}

/// Stops the walk on the first error or empty batch
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDoneBackoff;

#[async_trait]
impl Backoff for AlwaysDoneBackoff {
    async fn on_err(&mut self, _error: &ClientError) -> bool {
        false
    }

    async fn on_empty(&mut self) -> bool {
        false
    }

    fn reset(&mut self) {}
}

/// Waits a fixed interval after every error or empty batch and never gives up
#[derive(Debug, Clone, Copy)]
pub struct AlwaysRetryBackoff {
    interval: Duration,
}

impl AlwaysRetryBackoff {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl Backoff for AlwaysRetryBackoff {
    async fn on_err(&mut self, _error: &ClientError) -> bool {
        tokio::time::sleep(self.interval).await;
        true
    }

    async fn on_empty(&mut self) -> bool {
        tokio::time::sleep(self.interval).await;
        true
    }

    fn reset(&mut self) {}
}

/// Retries failed reads up to `max_retries` consecutive times
///
/// An empty batch ends the walk.
#[derive(Debug, Clone, Copy)]
pub struct RetryBackoff {
    interval: Duration,
    max_retries: u32,
    failures: u32,
}

impl RetryBackoff {
    pub fn new(interval: Duration, max_retries: u32) -> Self {
        Self {
            interval,
            max_retries,
            failures: 0,
        }
    }
}

#[async_trait]
impl Backoff for RetryBackoff {
    async fn on_err(&mut self, _error: &ClientError) -> bool {
        self.failures += 1;
        if self.failures > self.max_retries {
            return false;
        }

        tokio::time::sleep(self.interval).await;
        true
    }

    async fn on_empty(&mut self) -> bool {
        false
    }

    fn reset(&mut self) {
        self.failures = 0;
    }
}

/// Reports read errors through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

#[async_trait]
impl WalkObserver for TracingObserver {
    async fn on_read_error(&mut self, error: &ClientError) {
        warn!(error = %error, "Log cache read failed");
    }
}

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// The cancellation token fired
    Cancelled,
    /// The visitor asked to stop
    VisitorStopped,
    /// The backoff policy gave up after an error or an empty batch
    BackoffStopped,
    /// The walk reached its end time
    EndTimeReached,
}

/// Parameters of a walk
pub struct WalkOptions {
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    limit: Option<usize>,
    envelope_types: Vec<EnvelopeType>,
    backoff: Box<dyn Backoff>,
    observer: Box<dyn WalkObserver>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            start_time: DateTime::<Utc>::UNIX_EPOCH,
            end_time: None,
            limit: None,
            envelope_types: Vec::new(),
            backoff: Box::new(AlwaysDoneBackoff),
            observer: Box::new(TracingObserver),
        }
    }
}

impl fmt::Debug for WalkOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkOptions")
            .field("start_time", &self.start_time)
            .field("end_time", &self.end_time)
            .field("limit", &self.limit)
            .field("envelope_types", &self.envelope_types)
            .finish_non_exhaustive()
    }
}

impl WalkOptions {
    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Maximum number of envelopes per read
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_envelope_types(mut self, types: impl IntoIterator<Item = EnvelopeType>) -> Self {
        self.envelope_types = types.into_iter().collect();
        self
    }

    pub fn with_backoff(mut self, backoff: impl Backoff + 'static) -> Self {
        self.backoff = Box::new(backoff);
        self
    }

    pub fn with_observer(mut self, observer: impl WalkObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }
}

/// Walk a source until the visitor, the backoff policy, the end time or the
/// cancellation token stops it
///
/// # Arguments
/// * `source_id` - The source to read, usually an application GUID
/// * `visitor` - Receives every non-empty batch in read order
/// * `reader` - The log-cache read primitive
/// * `options` - Start time, filters and retry policy
/// * `cancel` - Stops the walk at the next check point
pub async fn walk<R, V>(
    source_id: &str,
    visitor: &mut V,
    reader: &R,
    options: WalkOptions,
    cancel: &CancellationToken,
) -> WalkEnd
where
    R: LogCacheReader + ?Sized,
    V: Visitor + ?Sized,
{
    let WalkOptions {
        start_time,
        end_time,
        limit,
        envelope_types,
        mut backoff,
        mut observer,
    } = options;

    let read_options = ReadOptions {
        end_time,
        limit,
        envelope_types,
        descending: false,
    };
    let end = end_time.map(unix_nanos);
    let mut start = unix_nanos(start_time);

    let outcome = loop {
        if cancel.is_cancelled() {
            break WalkEnd::Cancelled;
        }

        let read = reader.read(
            source_id,
            DateTime::from_timestamp_nanos(start),
            &read_options,
        );
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break WalkEnd::Cancelled,
            result = read => result,
        };

        match result {
            Err(error) => {
                observer.on_read_error(&error).await;

                let retry = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break WalkEnd::Cancelled,
                    retry = backoff.on_err(&error) => retry,
                };
                if !retry {
                    break WalkEnd::BackoffStopped;
                }
            }
            Ok(envelopes) if envelopes.is_empty() => {
                let retry = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break WalkEnd::Cancelled,
                    retry = backoff.on_empty() => retry,
                };
                if !retry {
                    break WalkEnd::BackoffStopped;
                }
            }
            Ok(envelopes) => {
                backoff.reset();

                if let Some(last) = envelopes.last() {
                    start = last.timestamp.saturating_add(1);
                }

                if !visitor.visit(envelopes).await {
                    break WalkEnd::VisitorStopped;
                }

                if end.is_some_and(|end| start >= end) {
                    break WalkEnd::EndTimeReached;
                }
            }
        }
    };

    debug!(source_id, outcome = ?outcome, "Walk finished");
    outcome
}
