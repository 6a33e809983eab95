//! Error types for the headless_datepicker crate.
//!
//! Engine operations never fail: an unparseable date is a `None` value and
//! a missing bound is "no constraint". Errors only come out of building
//! things from text (patterns, bounds strings) and out of the opt-in
//! configuration check.

use chrono::NaiveDate;

use crate::{MAX_WEEK_START, RANGE_SEPARATOR, prelude::*};

/// Error parsing a textual date, bounds string or week-start index.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid week start: {} (must be 0-{})", "_0", MAX_WEEK_START)]
    InvalidWeekStart(u8),
    #[display(fmt = "Invalid bounds format (expected 'min{}max'): {_0}", RANGE_SEPARATOR)]
    InvalidBounds(String),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Error tokenizing a date format pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// An unquoted letter that is not a supported field token.
    #[error("unknown pattern token '{token}' at position {position}")]
    UnknownToken { token: char, position: usize },

    /// A field letter repeated more times than the field supports.
    #[error("unsupported width for pattern token '{token}'")]
    UnsupportedWidth { token: String },
}

/// Error reported by [`CalendarConfig::check`](crate::CalendarConfig::check).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `max_date` falls on an earlier day than `min_date`.
    #[error("inverted date bounds: min ({min}) is after max ({max})")]
    InvertedBounds { min: NaiveDate, max: NaiveDate },

    /// Error parsing a textual configuration value.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Error tokenizing a format pattern.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        assert_eq!(
            ParseError::InvalidWeekStart(9).to_string(),
            "Invalid week start: 9 (must be 0-6)"
        );
        assert_eq!(ParseError::EmptyInput.to_string(), "Empty date string");
        assert_eq!(
            ParseError::InvalidBounds("x".to_owned()).to_string(),
            "Invalid bounds format (expected 'min/max'): x"
        );
    }

    #[test]
    fn test_pattern_error_display() {
        let e = PatternError::UnknownToken {
            token: 'Q',
            position: 3,
        };
        assert_eq!(e.to_string(), "unknown pattern token 'Q' at position 3");
    }

    #[test]
    fn test_config_error_wraps_sources() {
        let e: ConfigError = ParseError::EmptyInput.into();
        assert_eq!(e.to_string(), "Empty date string");

        let e: ConfigError = PatternError::UnsupportedWidth {
            token: "MMMM".to_owned(),
        }
        .into();
        assert!(matches!(e, ConfigError::Pattern(_)));
    }

    #[test]
    fn test_errors_are_std_errors() {
        fn assert_impl<T: std::error::Error + Send + Sync>() {}
        assert_impl::<ParseError>();
        assert_impl::<PatternError>();
        assert_impl::<ConfigError>();
    }
}
