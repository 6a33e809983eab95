use crate::ParseError;
use crate::consts::{JANUARY, MAX_WEEK_START, MIN_DAY};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Day a calendar week starts on, guaranteed to be in the range `0..=MAX_WEEK_START`
/// (0 = Sunday, 1 = Monday ... 6 = Saturday).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekStart(u8);

impl WeekStart {
    pub const SUNDAY: Self = Self(0);
    pub const MONDAY: Self = Self(1);
    pub const SATURDAY: Self = Self(6);

    /// Creates a new WeekStart, validating that it's <= `MAX_WEEK_START`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidWeekStart` if the value is > `MAX_WEEK_START`.
    pub const fn new(value: u8) -> Result<Self, ParseError> {
        if value > MAX_WEEK_START {
            return Err(ParseError::InvalidWeekStart(value));
        }
        Ok(Self(value))
    }

    /// Returns the index as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the chrono weekday this index names
    pub const fn weekday(self) -> Weekday {
        match self.0 {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }
}

impl TryFrom<u8> for WeekStart {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeekStart> for u8 {
    fn from(week_start: WeekStart) -> Self {
        week_start.0
    }
}

impl From<Weekday> for WeekStart {
    fn from(weekday: Weekday) -> Self {
        // num_days_from_sunday is always 0..=6
        Self(weekday.num_days_from_sunday() as u8)
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.weekday())
    }
}

/// One rendered day of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    /// The day, at midnight
    pub date: NaiveDateTime,
    /// Same month and year as the focused date
    pub in_month: bool,
    /// Inside the bounds and accepted by the validator
    pub is_valid: bool,
}

/// Gregorian leap year rule; `false` for years chrono cannot represent
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, JANUARY, MIN_DAY).is_some_and(|date| date.leap_year())
}

/// Length of `month` (1-12) in `year`; 0 for a month outside that range.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, MIN_DAY).map_or(0, |first| u32::from(first.num_days_in_month()))
}
