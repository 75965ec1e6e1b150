//! Display formatting for received messages.

use chrono::{DateTime, Local, TimeZone};

/// Formats server frames for the terminal.
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a received frame with a local wall-clock prefix.
    ///
    /// The leading `\r` wipes the input prompt so the message starts at
    /// the left margin; the caller redraws the prompt afterwards.
    pub fn format_incoming(text: &str) -> String {
        Self::format_incoming_at(text, Local::now())
    }

    fn format_incoming_at<Tz: TimeZone>(text: &str, at: DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("\r{} | {}\n", at.format("%H:%M:%S"), text)
    }
}
