//! Envelope DTOs returned by the log-cache v1 JSON gateway
//!
//! The gateway renders protobuf messages as JSON: 64-bit integers arrive as
//! strings, byte fields are base64 and enum fields equal to their zero value
//! are omitted.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::domain::envelope::{Envelope, EnvelopeMessage, Log, LogType};

/// Response body of `GET /api/v1/read/{source_id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadResponse {
    #[serde(default)]
    pub envelopes: EnvelopeBatch,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvelopeBatch {
    #[serde(default)]
    pub batch: Vec<EnvelopeDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeDto {
    #[serde(default, deserialize_with = "deserialize_int64")]
    pub timestamp: i64,
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    pub log: Option<LogDto>,
    pub counter: Option<serde_json::Value>,
    pub gauge: Option<serde_json::Value>,
    pub timer: Option<serde_json::Value>,
    pub event: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogDto {
    #[serde(default)]
    pub payload: String,
    #[serde(rename = "type", default)]
    pub log_type: LogTypeRepr,
}

/// Log type as rendered by the gateway: by name or by numeric code
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LogTypeRepr {
    Code(i32),
    Name(String),
}

impl Default for LogTypeRepr {
    fn default() -> Self {
        LogTypeRepr::Code(0)
    }
}

/// Errors raised while turning a wire envelope into a domain envelope
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvelopeDecodeError {
    #[error("invalid base64 log payload: {0}")]
    InvalidPayload(String),

    #[error("unknown log type: {0}")]
    UnknownLogType(String),
}

/// An envelope whose payload could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEnvelope {
    pub timestamp: i64,
    pub error: EnvelopeDecodeError,
}

impl TryFrom<LogDto> for Log {
    type Error = EnvelopeDecodeError;

    fn try_from(dto: LogDto) -> Result<Self, Self::Error> {
        let payload = STANDARD
            .decode(dto.payload.as_bytes())
            .map_err(|e| EnvelopeDecodeError::InvalidPayload(e.to_string()))?;

        let log_type = match dto.log_type {
            LogTypeRepr::Code(code) => LogType::from_i32(code),
            LogTypeRepr::Name(name) => LogType::from_str_name(&name)
                .ok_or(EnvelopeDecodeError::UnknownLogType(name))?,
        };

        Ok(Log { payload, log_type })
    }
}

impl EnvelopeDto {
    fn take_message(&mut self) -> Result<Option<EnvelopeMessage>, EnvelopeDecodeError> {
        if let Some(log) = self.log.take() {
            return Ok(Some(EnvelopeMessage::Log(log.try_into()?)));
        }

        let message = if self.counter.is_some() {
            Some(EnvelopeMessage::Counter)
        } else if self.gauge.is_some() {
            Some(EnvelopeMessage::Gauge)
        } else if self.timer.is_some() {
            Some(EnvelopeMessage::Timer)
        } else if self.event.is_some() {
            Some(EnvelopeMessage::Event)
        } else {
            None
        };
        Ok(message)
    }

    fn into_envelope(self, message: Option<EnvelopeMessage>) -> Envelope {
        Envelope {
            timestamp: self.timestamp,
            source_id: self.source_id,
            instance_id: self.instance_id,
            tags: self.tags,
            message,
        }
    }
}

impl ReadResponse {
    /// Decode every envelope of the batch, preserving order
    ///
    /// An envelope that fails to decode stays in the batch without a message,
    /// so paging still moves past its timestamp. Its error is returned
    /// alongside the batch.
    pub fn into_envelopes(self) -> (Vec<Envelope>, Vec<RejectedEnvelope>) {
        let mut rejected = Vec::new();

        let envelopes = self
            .envelopes
            .batch
            .into_iter()
            .map(|mut dto| {
                let message = dto.take_message().unwrap_or_else(|error| {
                    rejected.push(RejectedEnvelope {
                        timestamp: dto.timestamp,
                        error,
                    });
                    None
                });
                dto.into_envelope(message)
            })
            .collect();

        (envelopes, rejected)
    }
}

fn deserialize_int64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64Repr {
        Number(i64),
        Text(String),
    }

    match Int64Repr::deserialize(deserializer)? {
        Int64Repr::Number(value) => Ok(value),
        Int64Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}
