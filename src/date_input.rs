//! State of a masked text input bound to a date value.
//!
//! [`DateInput`] keeps the visible string and the mask buffer in step with
//! an externally owned date, turns mask completion into a callback, and
//! resolves partially typed text when the commit key is pressed.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    COMMIT_KEY, PatternError,
    clock::{Clock, SystemClock},
    format::{Pattern, parse_partial},
    mask::{MaskBlocks, MaskConfig, MaskEvent, MaskedInput, build_mask_config},
};

/// Inputs of a [`DateInput`], supplied again on every [`DateInput::update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateInputConfig {
    /// Date shown in the input, owned by the caller
    #[serde(default)]
    pub value:       Option<NaiveDateTime>,
    pub date_format: String,
    #[serde(default)]
    pub mask_blocks: MaskBlocks,
}

impl DateInputConfig {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            value:       None,
            date_format: date_format.into(),
            mask_blocks: MaskBlocks::default(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<Option<NaiveDateTime>>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn with_mask_blocks(mut self, mask_blocks: MaskBlocks) -> Self {
        self.mask_blocks = mask_blocks;
        self
    }
}

/// A key press routed to [`DateInput::on_key_press`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    key:                 String,
    default_prevented:   bool,
    propagation_stopped: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key:                 key.into(),
            default_prevented:   false,
            propagation_stopped: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub const fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub const fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

type CompleteCallback = Box<dyn FnMut(Option<NaiveDateTime>)>;

/// Masked date input state.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use headless_datepicker::{DateInput, DateInputConfig, FixedClock, KeyEvent};
///
/// let today = NaiveDate::from_ymd_opt(2021, 8, 7).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let mut input = DateInput::new(DateInputConfig::new("dd/MM/yyyy"), FixedClock(today)).unwrap();
///
/// input.set_input_value("2");
/// let mut enter = KeyEvent::new("Enter");
/// input.on_key_press(&mut enter);
///
/// assert_eq!(input.input_value(), "02/08/2021");
/// assert!(enter.is_default_prevented());
/// ```
pub struct DateInput<C = SystemClock> {
    config:      DateInputConfig,
    pattern:     Pattern,
    mask:        MaskedInput,
    input_value: String,
    clock:       C,
    on_complete: Option<CompleteCallback>,
}

impl<C: Clock> DateInput<C> {
    /// Builds the mask for `config` and shows its value, if any.
    ///
    /// # Errors
    /// Returns a `PatternError` if `date_format` does not tokenize.
    pub fn new(config: DateInputConfig, clock: C) -> Result<Self, PatternError> {
        let pattern = Pattern::new(&config.date_format)?;
        let mask = MaskedInput::new(build_mask_config(&config.mask_blocks, &pattern));

        let mut input = Self {
            config,
            pattern,
            mask,
            input_value: String::new(),
            clock,
            on_complete: None,
        };
        if let Some(value) = input.config.value {
            input.show(value);
        }
        Ok(input)
    }

    /// Registers the callback run when the mask completes, or with `None`
    /// when the input is cleared. Replaces any earlier callback.
    pub fn on_complete(&mut self, callback: impl FnMut(Option<NaiveDateTime>) + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Applies a new configuration.
    ///
    /// The mask is rebuilt only when the format or the blocks changed. A new
    /// value, or a new format while a value is set, overwrites the visible
    /// string and the mask buffer together.
    ///
    /// # Errors
    /// Returns a `PatternError` if the new `date_format` does not tokenize;
    /// the previous configuration stays in effect.
    pub fn update(&mut self, config: DateInputConfig) -> Result<(), PatternError> {
        let format_changed = config.date_format != self.config.date_format;
        if format_changed {
            self.pattern = Pattern::new(&config.date_format)?;
        }
        if format_changed || config.mask_blocks != self.config.mask_blocks {
            self.mask
                .set_config(build_mask_config(&config.mask_blocks, &self.pattern));
            self.input_value = self.mask.value().to_owned();
            debug!(format = %self.pattern, "mask rebuilt");
        }

        let value_changed = config.value != self.config.value;
        self.config = config;
        if let (true, Some(value)) = (value_changed || format_changed, self.config.value) {
            self.show(value);
        }
        Ok(())
    }

    fn show(&mut self, value: NaiveDateTime) {
        let text = self.pattern.format(value);
        debug!(value = %value, text = %text, "input follows value");
        self.set_input_value(text);
    }

    pub const fn config(&self) -> &DateInputConfig {
        &self.config
    }

    pub const fn mask_config(&self) -> &MaskConfig {
        self.mask.config()
    }

    /// Mask buffer, which normally equals [`DateInput::input_value`]
    pub fn mask_value(&self) -> &str {
        self.mask.value()
    }

    /// Text shown in the input
    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    /// Replaces the visible text, forcing the mask buffer to match.
    pub fn set_input_value(&mut self, text: impl Into<String>) {
        self.input_value = text.into();
        self.mask.force_value(self.input_value.clone());
    }

    /// `date` rendered under the current format
    pub fn render(&self, date: NaiveDateTime) -> String {
        self.pattern.format(date)
    }

    /// Parses partially typed `text`, filling the rest from the current moment.
    pub fn parse_partial(&self, text: &str) -> Option<NaiveDateTime> {
        parse_partial(text, &self.pattern, self.clock.now())
    }

    /// Handles edited text from the input element.
    pub fn on_change(&mut self, raw: &str) {
        for event in self.mask.input(raw, self.clock.now()) {
            match event {
                MaskEvent::Accept { value, .. } => self.input_value = value,
                MaskEvent::Complete { typed, .. } => {
                    debug!(typed = %typed, "input complete");
                    self.notify(Some(typed));
                }
            }
        }
        if raw.is_empty() {
            self.reset_value_on_delete();
        }
    }

    /// Reports a cleared selection to the completion callback.
    pub fn reset_value_on_delete(&mut self) {
        debug!("input cleared");
        self.notify(None);
    }

    /// Commits partial input on the commit key.
    ///
    /// Typed text that parses is replaced by the full rendering of the
    /// parsed date; anything else stays as typed. The event's default action
    /// and propagation are suppressed whether or not parsing succeeded.
    pub fn on_key_press(&mut self, event: &mut KeyEvent) {
        if event.key() != COMMIT_KEY {
            return;
        }

        match self.parse_partial(&self.input_value) {
            Some(date) => {
                let text = self.pattern.format(date);
                debug!(typed = %self.input_value, text = %text, "commit");
                self.set_input_value(text);
            }
            None => debug!(typed = %self.input_value, "commit ignored, input does not parse"),
        }

        event.prevent_default();
        event.stop_propagation();
    }

    fn notify(&mut self, value: Option<NaiveDateTime>) {
        if let Some(callback) = self.on_complete.as_mut() {
            callback(value);
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for DateInput<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateInput")
            .field("config", &self.config)
            .field("input_value", &self.input_value)
            .field("mask_value", &self.mask.value())
            .field("clock", &self.clock)
            .field("on_complete", &self.on_complete.is_some())
            .finish_non_exhaustive()
    }
}
