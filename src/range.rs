use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, ParseError, RANGE_SEPARATOR,
    date_utils::each_year_of_interval,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Optional lower and upper bound on selectable moments (both inclusive).
///
/// Bounds compare full timestamps. Grid cells sit at midnight, so a `min`
/// of `2000-01-01T12:00` leaves January 1st itself out. Nothing stops `min`
/// from being after `max`; such bounds admit nothing and enumerate no years.
///
/// Serializes as `{"minDate": .., "maxDate": ..}` with absent sides left
/// out; `Display`/`FromStr` give the compact `min/max` text form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateBounds {
    #[serde(rename = "minDate", default, skip_serializing_if = "Option::is_none")]
    min: Option<NaiveDateTime>,
    #[serde(rename = "maxDate", default, skip_serializing_if = "Option::is_none")]
    max: Option<NaiveDateTime>,
}

impl DateBounds {
    pub const fn new(min: Option<NaiveDateTime>, max: Option<NaiveDateTime>) -> Self {
        Self { min, max }
    }

    /// Bounds that admit every day
    pub const fn unbounded() -> Self {
        Self::new(None, None)
    }

    pub const fn min(&self) -> Option<NaiveDateTime> {
        self.min
    }

    pub const fn max(&self) -> Option<NaiveDateTime> {
        self.max
    }

    #[must_use]
    pub const fn with_min(mut self, min: NaiveDateTime) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub const fn with_max(mut self, max: NaiveDateTime) -> Self {
        self.max = Some(max);
        self
    }

    /// Checks if `date` is neither before `min` nor after `max`.
    /// A missing side never rejects.
    pub fn contains(&self, date: NaiveDateTime) -> bool {
        self.min.is_none_or(|min| date >= min) && self.max.is_none_or(|max| date <= max)
    }

    /// Both sides are set and `max` is earlier than `min`
    pub fn is_inverted(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }

    /// Reports inverted bounds as an error.
    ///
    /// # Errors
    /// Returns `ConfigError::InvertedBounds` if `min` falls after `max`.
    pub fn check(&self) -> Result<(), ConfigError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Err(ConfigError::InvertedBounds {
                min: min.date(),
                max: max.date(),
            }),
            _ => Ok(()),
        }
    }

    /// January 1st of every year from `min` to `max`, ascending.
    /// `None` unless both sides are set; empty when inverted.
    pub fn years(&self) -> Option<Vec<NaiveDateTime>> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(each_year_of_interval(min, max)),
            _ => None,
        }
    }
}

fn fmt_bound(date: Option<NaiveDateTime>) -> String {
    match date {
        None => String::new(),
        Some(d) if d.time() == NaiveTime::MIN => d.format(DATE_FORMAT).to_string(),
        Some(d) => d.format(DATE_TIME_FORMAT).to_string(),
    }
}

fn parse_bound(s: &str) -> Result<Option<NaiveDateTime>, ParseError> {
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(Some(date.and_time(NaiveTime::MIN)));
    }
    NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT)
        .map(Some)
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

impl fmt::Display for DateBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{RANGE_SEPARATOR}{}", fmt_bound(self.min), fmt_bound(self.max))
    }
}

impl FromStr for DateBounds {
    type Err = ParseError;

    /// Parses `min/max` where either side may be empty
    /// (`2000-01-01/`, `/2002-01-01T12:00:00`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();
        if separator_count != 1 {
            return Err(ParseError::InvalidBounds(s.to_owned()));
        }

        let (min_str, max_str) = trimmed
            .split_once(RANGE_SEPARATOR)
            .ok_or_else(|| ParseError::InvalidBounds(s.to_owned()))?;

        Ok(Self::new(parse_bound(min_str.trim())?, parse_bound(max_str.trim())?))
    }
}
