//! Date constructors shared by the unit tests.

use chrono::{NaiveDate, NaiveDateTime};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid test date {year}-{month}-{day}"))
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(hour, minute, second)
        .unwrap_or_else(|| panic!("invalid test time {hour}:{minute}:{second}"))
}

pub fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    at(year, month, day, 0, 0, 0)
}
