//! Pure calendar arithmetic over [`NaiveDateTime`].
//!
//! Every function takes and returns plain values. Arithmetic that would
//! leave chrono's representable range saturates to the input instead of
//! panicking, and month/year steps clamp the day to the target month's
//! length (Jan 31 + 1 month = Feb 28/29).

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::consts::{DAYS_IN_WEEK, DECEMBER, JANUARY, MIN_DAY, MONTHS_IN_YEAR};
use crate::types::{WeekStart, days_in_month};

/// Last representable instant of a day.
fn end_of_day_time() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}

fn first_of_month(date: NaiveDateTime) -> NaiveDate {
    date.date().with_day(MIN_DAY).unwrap_or_else(|| date.date())
}

/// Midnight of the same day
pub fn start_of_day(date: NaiveDateTime) -> NaiveDateTime {
    date.date().and_time(NaiveTime::MIN)
}

/// Last instant of the same day
pub fn end_of_day(date: NaiveDateTime) -> NaiveDateTime {
    date.date().and_time(end_of_day_time())
}

/// Midnight of the first day of the week containing `date`.
pub fn start_of_week(date: NaiveDateTime, week_start: WeekStart) -> NaiveDateTime {
    let weekday = date.weekday().num_days_from_sunday();
    let diff = (u32::from(DAYS_IN_WEEK) + weekday - u32::from(week_start.get())) % u32::from(DAYS_IN_WEEK);
    sub_days(start_of_day(date), i64::from(diff))
}

/// Last instant of the last day of the week containing `date`.
pub fn end_of_week(date: NaiveDateTime, week_start: WeekStart) -> NaiveDateTime {
    end_of_day(add_days(start_of_week(date, week_start), i64::from(DAYS_IN_WEEK) - 1))
}

/// Midnight of the first day of the month
pub fn start_of_month(date: NaiveDateTime) -> NaiveDateTime {
    first_of_month(date).and_time(NaiveTime::MIN)
}

/// Last instant of the last day of the month
pub fn end_of_month(date: NaiveDateTime) -> NaiveDateTime {
    let last = days_in_month(date.year(), date.month());
    date.date()
        .with_day(last)
        .unwrap_or_else(|| date.date())
        .and_time(end_of_day_time())
}

/// Midnight of January 1st
pub fn start_of_year(date: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(date.year(), JANUARY, MIN_DAY)
        .unwrap_or_else(|| date.date())
        .and_time(NaiveTime::MIN)
}

/// Last instant of December 31st
pub fn end_of_year(date: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(date.year(), DECEMBER, days_in_month(date.year(), DECEMBER))
        .unwrap_or_else(|| date.date())
        .and_time(end_of_day_time())
}

pub fn add_days(date: NaiveDateTime, days: i64) -> NaiveDateTime {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(date)
}

pub fn sub_days(date: NaiveDateTime, days: i64) -> NaiveDateTime {
    add_days(date, days.saturating_neg())
}

pub fn add_weeks(date: NaiveDateTime, weeks: i64) -> NaiveDateTime {
    add_days(date, weeks.saturating_mul(i64::from(DAYS_IN_WEEK)))
}

pub fn add_months(date: NaiveDateTime, months: i32) -> NaiveDateTime {
    let step = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(step)
    } else {
        date.checked_sub_months(step)
    };
    shifted.unwrap_or(date)
}

pub fn sub_months(date: NaiveDateTime, months: i32) -> NaiveDateTime {
    add_months(date, months.saturating_neg())
}

pub fn add_years(date: NaiveDateTime, years: i32) -> NaiveDateTime {
    // MONTHS_IN_YEAR is 12, always fits i32
    add_months(date, years.saturating_mul(MONTHS_IN_YEAR as i32))
}

pub fn sub_years(date: NaiveDateTime, years: i32) -> NaiveDateTime {
    add_years(date, years.saturating_neg())
}

/// Same calendar day, time of day ignored
pub fn is_same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

pub fn is_same_month(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn is_same_year(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.year() == b.year()
}

/// `a` falls on an earlier calendar day than `b`
pub fn is_before_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() < b.date()
}

/// `a` falls on a later calendar day than `b`
pub fn is_after_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() > b.date()
}

/// Canonical calendar-day identity (`YYYY-MM-DD`), used to detect value
/// changes across observations.
pub fn day_key(date: NaiveDateTime) -> String {
    date.date().format("%Y-%m-%d").to_string()
}

/// Walks from `first` with `step` while the dates stay `<= last`.
/// Stops early if the step stops making progress (range saturation).
fn each_between(
    first: NaiveDateTime,
    last: NaiveDateTime,
    step: impl Fn(NaiveDateTime) -> NaiveDateTime,
) -> Vec<NaiveDateTime> {
    std::iter::successors(Some(first), |current| {
        let next = step(*current);
        (next > *current).then_some(next)
    })
    .take_while(|current| *current <= last)
    .collect()
}

/// Every day from `start` to `end` inclusive, at midnight.
/// Empty when `start` is after `end`.
pub fn each_day_of_interval(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
    each_between(start_of_day(start), start_of_day(end), |d| add_days(d, 1))
}

/// First day of every month from `start` to `end` inclusive.
pub fn each_month_of_interval(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
    each_between(start_of_month(start), start_of_month(end), |d| add_months(d, 1))
}

/// January 1st of every year from `start` to `end` inclusive.
pub fn each_year_of_interval(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
    each_between(start_of_year(start), start_of_year(end), |d| add_years(d, 1))
}
