//! Envelope to log message conversion

use chrono::DateTime;

use crate::domain::envelope::{Envelope, SOURCE_TYPE_TAG};
use crate::domain::log::LogMessage;

/// Convert a single envelope into a log message
///
/// Returns `None` for every non-log envelope.
pub fn convert_envelope(envelope: &Envelope) -> Option<LogMessage> {
    let log = envelope.as_log()?;

    Some(LogMessage::new(
        String::from_utf8_lossy(&log.payload),
        log.log_type.as_str_name(),
        DateTime::from_timestamp_nanos(envelope.timestamp),
        envelope.tag(SOURCE_TYPE_TAG),
        envelope.instance_id.as_str(),
    ))
}

/// Convert a batch of envelopes, keeping only log envelopes in input order
pub fn convert_envelopes(envelopes: &[Envelope]) -> Vec<LogMessage> {
    envelopes.iter().filter_map(convert_envelope).collect()
}
