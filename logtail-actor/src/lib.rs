//! Logtail Actor
//!
//! The log tailing layer consumed by the command line:
//!
//! - [`get_streaming_logs`] continuously walks the log cache for an
//!   application and delivers [`LogMessage`]s over a bounded channel, with
//!   read diagnostics on a second channel and a cancellation token to stop it
//! - [`RecentLogFetcher`] fetches a finite batch of recent messages
//! - [`Actor`] resolves an application name to its GUID before delegating to
//!   either of the above
//!
//! [`LogMessage`]: logtail_core::domain::log::LogMessage

mod actor;
mod error;
mod error_sink;
mod recent;
mod streaming;

pub use actor::{Actor, ActorResult, ApplicationResolver};
pub use error::ActorError;
pub use error_sink::ErrorSink;
pub use recent::{RecentLogFetcher, RecentLogOrder, RecentLogSource};
pub use streaming::{
    LogStream, RETRY_INTERVAL, STREAM_BUFFER_SIZE, STREAM_LOOKBACK, StreamPump,
    get_streaming_logs,
};
