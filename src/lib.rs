//! Render-agnostic state for date widgets: a month calendar, a masked date
//! input and a dropdown date picker.
//!
//! Nothing here draws. Callers feed in configuration and user events, read
//! back plain data ([`CalendarView`], [`DateInput::input_value`],
//! [`DropdownView`]) and render it however they like.

mod calendar;
mod clock;
mod consts;
mod date_input;
pub mod date_utils;
mod datepicker;
mod dropdown;
mod error;
pub mod format;
pub mod mask;
mod prelude;
mod range;
mod types;

#[cfg(test)]
mod test_utils;

pub use calendar::{Calendar, CalendarConfig, CalendarView, DateValidator};
pub use clock::{Clock, FixedClock, SystemClock};
pub use consts::*;
pub use date_input::{DateInput, DateInputConfig, KeyEvent};
pub use datepicker::{Datepicker, DatepickerConfig, DatepickerView};
pub use dropdown::{ContainerRef, Dropdown, DropdownConfig, DropdownView};
pub use error::{ConfigError, ParseError, PatternError};
pub use format::Pattern;
pub use mask::{BlockRule, MaskBlocks, MaskConfig, MaskEvent, MaskedInput};
pub use range::DateBounds;
pub use types::{DayCell, WeekStart, days_in_month, is_leap_year};
