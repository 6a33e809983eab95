//! A calendar inside a dropdown.
//!
//! The two halves stay separate objects; [`DatepickerView`] flattens their
//! views into one map for callers that want a single record.

use serde::{Deserialize, Serialize};

use crate::{
    calendar::{Calendar, CalendarConfig, CalendarView},
    clock::{Clock, SystemClock},
    dropdown::{Dropdown, DropdownConfig, DropdownView},
};

/// One configuration object for both halves of a [`Datepicker`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatepickerConfig {
    #[serde(flatten)]
    pub calendar: CalendarConfig,
    #[serde(flatten)]
    pub dropdown: DropdownConfig,
}

impl DatepickerConfig {
    pub const fn new(calendar: CalendarConfig, dropdown: DropdownConfig) -> Self {
        Self { calendar, dropdown }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatepickerView {
    #[serde(flatten)]
    pub calendar: CalendarView,
    #[serde(flatten)]
    pub dropdown: DropdownView,
}

#[derive(Debug, Clone)]
pub struct Datepicker {
    calendar: Calendar,
    dropdown: Dropdown,
}

impl Datepicker {
    pub fn new(config: DatepickerConfig) -> Self {
        Self::with_clock(config, &SystemClock)
    }

    pub fn with_clock(config: DatepickerConfig, clock: &impl Clock) -> Self {
        Self {
            calendar: Calendar::with_clock(config.calendar, clock),
            dropdown: Dropdown::new(config.dropdown),
        }
    }

    /// Routes each half of `config` to its owner.
    pub fn update(&mut self, config: DatepickerConfig) {
        self.calendar.update(config.calendar);
        self.dropdown.set_config(config.dropdown);
    }

    pub const fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub const fn calendar_mut(&mut self) -> &mut Calendar {
        &mut self.calendar
    }

    pub const fn dropdown(&self) -> &Dropdown {
        &self.dropdown
    }

    pub const fn dropdown_mut(&mut self) -> &mut Dropdown {
        &mut self.dropdown
    }

    pub fn view(&self) -> DatepickerView {
        DatepickerView {
            calendar: self.calendar.view(),
            dropdown: self.dropdown.view(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::Value;

    use super::*;
    use crate::{
        WeekStart,
        clock::FixedClock,
        dropdown::ContainerRef,
        test_utils::{at, midnight},
    };

    fn keys(value: &Value) -> BTreeSet<String> {
        value
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn datepicker(config: DatepickerConfig) -> Datepicker {
        Datepicker::with_clock(config, &FixedClock(at(2021, 7, 7, 12, 0, 0)))
    }

    #[test]
    fn test_view_fields_are_disjoint() {
        let mut picker = datepicker(DatepickerConfig::default());
        picker.dropdown_mut().set_container(ContainerRef::from(1));
        let view = picker.view();

        let calendar = keys(&serde_json::to_value(&view.calendar).unwrap());
        let dropdown = keys(&serde_json::to_value(view.dropdown).unwrap());
        assert!(!calendar.is_empty());
        assert!(!dropdown.is_empty());
        assert!(calendar.is_disjoint(&dropdown), "{calendar:?} overlaps {dropdown:?}");

        let merged = keys(&serde_json::to_value(&view).unwrap());
        assert_eq!(merged.len(), calendar.len() + dropdown.len());
    }

    #[test]
    fn test_config_fields_are_disjoint() {
        let calendar = keys(&serde_json::to_value(CalendarConfig::default()).unwrap());
        let dropdown = keys(&serde_json::to_value(DropdownConfig::default()).unwrap());
        assert!(calendar.is_disjoint(&dropdown), "{calendar:?} overlaps {dropdown:?}");
    }

    #[test]
    fn test_one_config_feeds_both_halves() {
        let json = r#"{
            "value": "2021-07-07T00:00:00",
            "weekStartsOn": 1,
            "openOnFocus": false
        }"#;
        let config: DatepickerConfig = serde_json::from_str(json).unwrap();
        let mut picker = datepicker(config);

        assert_eq!(picker.calendar().focused_date(), midnight(2021, 7, 1));
        assert_eq!(picker.calendar().config().week_starts_on(), WeekStart::MONDAY);
        assert_eq!(picker.view().calendar.days[0].date, midnight(2021, 6, 28));

        picker.dropdown_mut().on_focus();
        assert!(!picker.dropdown().is_open());
        assert!(picker.dropdown().config().close_on_outside_interaction);
    }

    #[test]
    fn test_update_routes_to_both_halves() {
        let mut picker = datepicker(DatepickerConfig::default());
        assert_eq!(picker.calendar().focused_date(), midnight(2021, 7, 1));

        picker.update(DatepickerConfig::new(
            CalendarConfig::new().with_value(midnight(2022, 3, 3)),
            DropdownConfig {
                open_on_focus: false,
                ..DropdownConfig::default()
            },
        ));
        assert_eq!(picker.calendar().focused_date(), midnight(2022, 3, 1));
        assert!(!picker.dropdown().config().open_on_focus);
    }

    #[test]
    fn test_navigation_and_dropdown_are_independent() {
        let mut picker = datepicker(DatepickerConfig::default());
        picker.dropdown_mut().open();
        picker.calendar_mut().next_month();

        let view = picker.view();
        assert!(view.dropdown.is_open);
        assert_eq!(view.calendar.focused_date, midnight(2021, 8, 1));
    }
}
