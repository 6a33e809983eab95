/// Days in one calendar week
pub const DAYS_IN_WEEK: u8 = 7;

/// Rows of the month grid, fixed so every month renders the same height
pub const WEEKS_IN_CALENDAR_MONTH: u8 = 6;

/// Cells in the month grid (`WEEKS_IN_CALENDAR_MONTH` full weeks)
pub const CALENDAR_GRID_LEN: usize = (DAYS_IN_WEEK as usize) * (WEEKS_IN_CALENDAR_MONTH as usize);

/// Months in a calendar year
pub const MONTHS_IN_YEAR: u32 = 12;

/// Largest week-start index (6 = Saturday, 0 = Sunday)
pub const MAX_WEEK_START: u8 = 6;

/// Month numbers, 1-based as in `chrono::Datelike::month`
pub const JANUARY: u32 = 1;
pub const FEBRUARY: u32 = 2;
pub const DECEMBER: u32 = 12;

/// First day of any month
pub const MIN_DAY: u32 = 1;

/// Two-digit years resolve to the year closest to the reference, within this window
pub(crate) const TWO_DIGIT_YEAR_WINDOW: i32 = 50;

/// Separator between the min and max side of a bounds string
pub const RANGE_SEPARATOR: char = '/';

/// Quote character delimiting literal text inside a format pattern
pub const PATTERN_QUOTE: char = '\'';

/// Default accepted range for the day-of-month block
pub const DEFAULT_DAY_RANGE: (u32, u32) = (1, 31);
/// Default accepted range for the month block
pub const DEFAULT_MONTH_RANGE: (u32, u32) = (1, 12);
/// Default accepted range for the four-digit year block
pub const DEFAULT_YEAR_RANGE: (u32, u32) = (1900, 9999);
/// Accepted range for the hour block (24h clock)
pub const HOUR_RANGE: (u32, u32) = (0, 23);
/// Accepted range for minute and second blocks
pub const MINUTE_RANGE: (u32, u32) = (0, 59);

/// Key name of the commit gesture in a date input
pub const COMMIT_KEY: &str = "Enter";
