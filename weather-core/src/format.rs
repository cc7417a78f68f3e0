//! Display helpers shared by every screen of the app.
//!
//! `format_date` and `format_historical_date` differ only by the period after
//! the year; both layouts are in use, so both are kept.

use chrono::{DateTime, FixedOffset, TimeZone};

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("invalid timestamp '{input}': {source}")]
    InvalidTimestamp {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Anything that can be shown as a calendar date and wall-clock time.
///
/// Values are shown at their own offset, never converted: `DateTime`s keep
/// their zone and text is parsed as RFC 3339 with the offset it carries.
/// Convert to local time before formatting when that is wanted.
pub trait DateInput {
    fn to_datetime(&self) -> Result<DateTime<FixedOffset>, FormatError>;
}

impl DateInput for str {
    fn to_datetime(&self) -> Result<DateTime<FixedOffset>, FormatError> {
        DateTime::parse_from_rfc3339(self).map_err(|source| FormatError::InvalidTimestamp {
            input: self.to_string(),
            source,
        })
    }
}

impl DateInput for String {
    fn to_datetime(&self) -> Result<DateTime<FixedOffset>, FormatError> {
        self.as_str().to_datetime()
    }
}

impl<Tz: TimeZone> DateInput for DateTime<Tz> {
    fn to_datetime(&self) -> Result<DateTime<FixedOffset>, FormatError> {
        Ok(self.fixed_offset())
    }
}

/// `DD.MM.YYYY. - HH:mm`
pub fn format_date<T: DateInput + ?Sized>(input: &T) -> Result<String, FormatError> {
    Ok(input.to_datetime()?.format("%d.%m.%Y. - %H:%M").to_string())
}

/// `DD.MM.YYYY - HH:mm`
pub fn format_historical_date<T: DateInput + ?Sized>(input: &T) -> Result<String, FormatError> {
    Ok(input.to_datetime()?.format("%d.%m.%Y - %H:%M").to_string())
}

/// Uppercase the first character and leave the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase the first character of every whitespace-delimited word.
pub fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if at_word_start && !c.is_whitespace() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }

    out
}
