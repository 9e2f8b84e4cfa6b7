//! Terminal rendering of log messages

use chrono::{Local, TimeZone};
use colored::*;
use logtail_core::Warnings;
use logtail_core::domain::log::LogMessage;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Render a message as one output line per line of its text
///
/// Every line carries the full header so multi-line messages stay greppable.
pub fn format_log_message<Tz>(message: &LogMessage, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let header = format!(
        "   {} [{}/{}] {}",
        message
            .timestamp()
            .with_timezone(tz)
            .format(TIMESTAMP_FORMAT),
        message.source_type(),
        message.source_instance(),
        message.message_type(),
    );

    message
        .message()
        .trim_end_matches(['\r', '\n'])
        .split('\n')
        .map(|line| format!("{} {}", header, line.trim_end_matches('\r')))
        .collect()
}

/// Print a message in local time, ERR lines in red
pub fn print_log_message(message: &LogMessage) {
    for line in format_log_message(message, &Local) {
        if message.message_type() == "ERR" {
            println!("{}", line.red());
        } else if message.staging() {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }
}

/// Print API warnings to stderr
pub fn print_warnings(warnings: &Warnings) {
    for warning in warnings {
        eprintln!("{}", warning.yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Utc};

    fn message(text: &str, message_type: &str) -> LogMessage {
        LogMessage::new(
            text,
            message_type,
            DateTime::from_timestamp_nanos(1_600_000_000_123_000_000),
            "APP/PROC/WEB",
            "0",
        )
    }

    #[test]
    fn test_format_single_line() {
        let lines = format_log_message(&message("hello\n", "OUT"), &Utc);
        assert_eq!(
            lines,
            vec!["   2020-09-13T12:26:40.123+0000 [APP/PROC/WEB/0] OUT hello".to_string()]
        );
    }

    #[test]
    fn test_format_multi_line() {
        let lines = format_log_message(&message("first\r\nsecond", "ERR"), &Utc);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] ERR first"));
        assert!(lines[1].ends_with("] ERR second"));
    }

    #[test]
    fn test_format_uses_timezone() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let lines = format_log_message(&message("hello", "OUT"), &offset);
        assert!(lines[0].starts_with("   2020-09-13T14:26:40.123+0200"));
    }
}
