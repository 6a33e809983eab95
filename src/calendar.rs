//! Calendar view state: a focused month and everything derived from it.
//!
//! The only stored state is the focused date (midnight on the first of a
//! month) and the calendar-day key of the last observed external value.
//! The day grid, month list and year list are recomputed from that state
//! and the current configuration on every read.

use std::{fmt, sync::Arc};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    CALENDAR_GRID_LEN, ConfigError, DateBounds, DayCell, WeekStart,
    clock::{Clock, SystemClock},
    date_utils::{
        add_days, add_months, add_years, day_key, each_month_of_interval, end_of_year, is_same_day,
        is_same_month, start_of_month, start_of_week, start_of_year, sub_months, sub_years,
    },
};

/// Caller-supplied predicate marking days as selectable.
#[derive(Clone)]
pub struct DateValidator(Arc<dyn Fn(NaiveDateTime) -> bool + Send + Sync>);

impl DateValidator {
    pub fn new(validate: impl Fn(NaiveDateTime) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(validate))
    }

    pub fn accepts(&self, date: NaiveDateTime) -> bool {
        (self.0)(date)
    }
}

impl fmt::Debug for DateValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DateValidator(..)")
    }
}

/// Configuration of a [`Calendar`].
///
/// Every field is optional. Use the builder methods to set them.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use headless_datepicker::{CalendarConfig, WeekStart};
///
/// let july = NaiveDate::from_ymd_opt(2021, 7, 7).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let config = CalendarConfig::new()
///     .with_value(july)
///     .with_week_starts_on(WeekStart::MONDAY);
///
/// assert!(config.check().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarConfig {
    /// Selected date, owned by the caller
    value:          Option<NaiveDateTime>,
    /// Month to show first when there is no value
    start_date:     Option<NaiveDateTime>,
    /// `minDate` and `maxDate`
    #[serde(flatten)]
    bounds:         DateBounds,
    week_starts_on: WeekStart,
    #[serde(skip)]
    validate:       Option<DateValidator>,
}

impl CalendarConfig {
    /// Creates an empty configuration: no value, no bounds, weeks start on Sunday.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<Option<NaiveDateTime>>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn with_start_date(mut self, start_date: impl Into<Option<NaiveDateTime>>) -> Self {
        self.start_date = start_date.into();
        self
    }

    #[must_use]
    pub fn with_min_date(mut self, min_date: NaiveDateTime) -> Self {
        self.bounds = self.bounds.with_min(min_date);
        self
    }

    #[must_use]
    pub fn with_max_date(mut self, max_date: NaiveDateTime) -> Self {
        self.bounds = self.bounds.with_max(max_date);
        self
    }

    #[must_use]
    pub const fn with_bounds(mut self, bounds: DateBounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[must_use]
    pub const fn with_week_starts_on(mut self, week_starts_on: WeekStart) -> Self {
        self.week_starts_on = week_starts_on;
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validate: impl Fn(NaiveDateTime) -> bool + Send + Sync + 'static) -> Self {
        self.validate = Some(DateValidator::new(validate));
        self
    }

    pub const fn value(&self) -> Option<NaiveDateTime> {
        self.value
    }

    pub const fn start_date(&self) -> Option<NaiveDateTime> {
        self.start_date
    }

    pub const fn bounds(&self) -> &DateBounds {
        &self.bounds
    }

    pub const fn week_starts_on(&self) -> WeekStart {
        self.week_starts_on
    }

    /// Reports configurations that make the calendar degenerate.
    ///
    /// The calendar itself never calls this: inverted bounds simply produce
    /// an empty year list and a grid with no valid day.
    ///
    /// # Errors
    /// Returns `ConfigError::InvertedBounds` if the min date falls after the max date.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.bounds.check()
    }

    /// Day is inside the bounds and accepted by the validator
    pub fn is_valid(&self, date: NaiveDateTime) -> bool {
        self.bounds.contains(date) && self.validate.as_ref().is_none_or(|v| v.accepts(date))
    }
}

/// Everything a month view needs, computed at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub focused_date: NaiveDateTime,
    pub days:         Vec<DayCell>,
    pub months:       Vec<NaiveDateTime>,
    pub years:        Option<Vec<NaiveDateTime>>,
}

/// Calendar navigation state.
#[derive(Debug, Clone)]
pub struct Calendar {
    config:         CalendarConfig,
    focused_date:   NaiveDateTime,
    observed_value: Option<String>,
}

impl Calendar {
    /// Creates a calendar focused on the month of the value, else the start
    /// date, else the min date, else the max date, else today.
    pub fn new(config: CalendarConfig) -> Self {
        Self::with_clock(config, &SystemClock)
    }

    /// Like [`Calendar::new`], reading "today" from `clock`.
    pub fn with_clock(config: CalendarConfig, clock: &impl Clock) -> Self {
        let seed = config
            .value
            .or(config.start_date)
            .or(config.bounds.min())
            .or(config.bounds.max())
            .unwrap_or_else(|| clock.now());
        warn_if_inverted(&config);

        let calendar = Self {
            focused_date: start_of_month(seed),
            observed_value: config.value.map(day_key),
            config,
        };
        debug!(focused = %calendar.focused_date.date(), "calendar created");
        calendar
    }

    /// Applies a new configuration.
    ///
    /// A value whose calendar day differs from the last observed one moves
    /// the focus to that value's month before anything else is derived, so
    /// the next read already reflects it. Clearing the value leaves the
    /// focus where it is.
    pub fn update(&mut self, config: CalendarConfig) {
        self.sync_value(config.value);
        if config.bounds != self.config.bounds {
            warn_if_inverted(&config);
        }
        self.config = config;
    }

    fn sync_value(&mut self, value: Option<NaiveDateTime>) {
        let key = value.map(day_key);
        if key == self.observed_value {
            return;
        }
        if let Some(value) = value {
            self.focused_date = start_of_month(value);
            debug!(value = %value.date(), focused = %self.focused_date.date(), "focus follows value");
        }
        self.observed_value = key;
    }

    pub const fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// First day of the month the grid shows, at midnight
    pub const fn focused_date(&self) -> NaiveDateTime {
        self.focused_date
    }

    /// Moves the view to the month containing `date`.
    pub fn set_focused_date(&mut self, date: NaiveDateTime) {
        self.focused_date = start_of_month(date);
        debug!(focused = %self.focused_date.date(), "focus set");
    }

    /// The six weeks shown for the focused month, starting on the configured
    /// week day on or before the 1st. Always `CALENDAR_GRID_LEN` cells.
    pub fn days(&self) -> Vec<DayCell> {
        let start = start_of_week(self.focused_date, self.config.week_starts_on);
        (0_i64..)
            .take(CALENDAR_GRID_LEN)
            .map(|offset| {
                let date = add_days(start, offset);
                DayCell {
                    date,
                    in_month: is_same_month(date, self.focused_date),
                    is_valid: self.config.is_valid(date),
                }
            })
            .collect()
    }

    /// First day of each month of the focused year
    pub fn months(&self) -> Vec<NaiveDateTime> {
        each_month_of_interval(start_of_year(self.focused_date), end_of_year(self.focused_date))
    }

    /// January 1st of each year from min to max date; `None` unless both are set
    pub fn years(&self) -> Option<Vec<NaiveDateTime>> {
        self.config.bounds.years()
    }

    /// `date` falls on the same calendar day as the value
    pub fn is_selected(&self, date: NaiveDateTime) -> bool {
        self.config.value.is_some_and(|value| is_same_day(value, date))
    }

    pub fn next_month(&mut self) {
        self.focused_date = add_months(self.focused_date, 1);
        debug!(focused = %self.focused_date.date(), "next month");
    }

    pub fn previous_month(&mut self) {
        self.focused_date = sub_months(self.focused_date, 1);
        debug!(focused = %self.focused_date.date(), "previous month");
    }

    pub fn next_year(&mut self) {
        self.focused_date = add_years(self.focused_date, 1);
        debug!(focused = %self.focused_date.date(), "next year");
    }

    pub fn previous_year(&mut self) {
        self.focused_date = sub_years(self.focused_date, 1);
        debug!(focused = %self.focused_date.date(), "previous year");
    }

    /// Snapshot of the focused date and every derived collection
    pub fn view(&self) -> CalendarView {
        CalendarView {
            focused_date: self.focused_date,
            days:         self.days(),
            months:       self.months(),
            years:        self.years(),
        }
    }
}

fn warn_if_inverted(config: &CalendarConfig) {
    if let Err(e) = config.check() {
        warn!(error = %e, "calendar configured with unusable bounds");
    }
}
