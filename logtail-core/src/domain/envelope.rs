//! Log-cache envelope types
//!
//! An envelope is the unit of telemetry stored by the log cache. Each one
//! carries exactly one payload variant; only [`EnvelopeMessage::Log`] is
//! relevant to log tailing, the others are kept so they can be recognized and
//! skipped.

use std::collections::HashMap;
use std::fmt;

/// Tag holding the origin subsystem of an envelope
pub const SOURCE_TYPE_TAG: &str = "source_type";

/// A single envelope read from the log cache
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Nanoseconds since the Unix epoch
    pub timestamp: i64,
    pub source_id: String,
    pub instance_id: String,
    pub tags: HashMap<String, String>,
    pub message: Option<EnvelopeMessage>,
}

impl Envelope {
    /// Returns the log payload if this is a log envelope
    pub fn as_log(&self) -> Option<&Log> {
        match &self.message {
            Some(EnvelopeMessage::Log(log)) => Some(log),
            _ => None,
        }
    }

    /// Returns the value of a tag, or an empty string when unset
    pub fn tag(&self, name: &str) -> &str {
        self.tags.get(name).map(String::as_str).unwrap_or_default()
    }
}

/// Payload variant carried by an envelope
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeMessage {
    Log(Log),
    Counter,
    Gauge,
    Timer,
    Event,
}

/// Log payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub payload: Vec<u8>,
    pub log_type: LogType,
}

/// Stream a log line was written to
///
/// Codes this crate does not know are carried through as [`LogType::Unknown`]
/// so the line is still shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LogType {
    #[default]
    Out,
    Err,
    Unknown(i32),
}

impl LogType {
    /// Symbolic name used on the wire, empty for unknown codes
    pub fn as_str_name(&self) -> &'static str {
        match self {
            LogType::Out => "OUT",
            LogType::Err => "ERR",
            LogType::Unknown(_) => "",
        }
    }

    pub fn from_str_name(name: &str) -> Option<Self> {
        match name {
            "OUT" => Some(LogType::Out),
            "ERR" => Some(LogType::Err),
            _ => None,
        }
    }

    pub fn from_i32(code: i32) -> Self {
        match code {
            0 => LogType::Out,
            1 => LogType::Err,
            other => LogType::Unknown(other),
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}

/// Envelope filter accepted by log-cache reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeType {
    Any,
    Log,
    Counter,
    Gauge,
    Timer,
    Event,
}

impl EnvelopeType {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            EnvelopeType::Any => "ANY",
            EnvelopeType::Log => "LOG",
            EnvelopeType::Counter => "COUNTER",
            EnvelopeType::Gauge => "GAUGE",
            EnvelopeType::Timer => "TIMER",
            EnvelopeType::Event => "EVENT",
        }
    }
}

impl fmt::Display for EnvelopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}
