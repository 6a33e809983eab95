//! Masked date input: a pattern split into numeric blocks and fixed text.
//!
//! Each field of the pattern becomes a block with an accepted numeric
//! range; everything else is fixed text the mask inserts by itself. The
//! live [`MaskedInput`] keeps the buffer conformed to the mask and reports
//! what changed as [`MaskEvent`]s.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    DEFAULT_DAY_RANGE, DEFAULT_MONTH_RANGE, DEFAULT_YEAR_RANGE, HOUR_RANGE, MINUTE_RANGE,
    format::{Field, Pattern, Token, parse_partial},
    prelude::*,
};

/// Accepted range of one numeric block, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRule {
    pub from: u32,
    pub to: u32,
    /// Digits in the block; defaults to the digit count of `to`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl BlockRule {
    pub const fn new(from: u32, to: u32) -> Self {
        Self {
            from,
            to,
            max_length: None,
        }
    }

    #[must_use]
    pub const fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    const fn from_range((from, to): (u32, u32)) -> Self {
        Self::new(from, to)
    }

    /// Digits the block holds when full
    pub fn width(&self) -> usize {
        self.max_length
            .unwrap_or_else(|| self.to.checked_ilog10().map_or(1, |log| log as usize + 1))
    }

    /// Whether `digits` as typed already lands in range
    fn accepts_value(&self, digits: &str) -> bool {
        digits
            .parse::<u32>()
            .is_ok_and(|value| (self.from..=self.to).contains(&value))
    }

    /// Whether some completion of `digits` to the full width lands in range.
    fn accepts_prefix(&self, digits: &str) -> bool {
        let Ok(value) = digits.parse::<u64>() else {
            return false;
        };
        let pad = u32::try_from(self.width().saturating_sub(digits.len())).unwrap_or(u32::MAX);
        let Some(scale) = 10_u64.checked_pow(pad) else {
            return false;
        };
        let lowest = value.saturating_mul(scale);
        let highest = lowest.saturating_add(scale - 1);
        lowest <= u64::from(self.to) && highest >= u64::from(self.from)
    }
}

/// Rule used for a field the caller gave no block for. Its width is the
/// digit count of the range's upper end.
fn builtin_rule(field: Field, width: usize) -> BlockRule {
    match (field, width) {
        (Field::Year, 2) => BlockRule::new(0, 99),
        (Field::Year, _) => BlockRule::from_range(DEFAULT_YEAR_RANGE),
        (Field::Month, _) => BlockRule::from_range(DEFAULT_MONTH_RANGE),
        (Field::Day, _) => BlockRule::from_range(DEFAULT_DAY_RANGE),
        (Field::Hour, _) => BlockRule::from_range(HOUR_RANGE),
        (Field::Minute | Field::Second, _) => BlockRule::from_range(MINUTE_RANGE),
    }
}

/// Block rules keyed by the pattern token they apply to (`"dd"`, `"MM"`, `"yyyy"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskBlocks(BTreeMap<String, BlockRule>);

impl MaskBlocks {
    /// No caller rules; every field falls back to its built-in range
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn with_block(mut self, token: impl Into<String>, rule: BlockRule) -> Self {
        self.0.insert(token.into(), rule);
        self
    }
}

impl Default for MaskBlocks {
    /// Day 1-31, month 1-12, four-digit year 1900-9999
    fn default() -> Self {
        Self::empty()
            .with_block("dd", BlockRule::from_range(DEFAULT_DAY_RANGE).with_max_length(2))
            .with_block("MM", BlockRule::from_range(DEFAULT_MONTH_RANGE).with_max_length(2))
            .with_block("yyyy", BlockRule::from_range(DEFAULT_YEAR_RANGE))
    }
}

/// One piece of a mask.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Editable digits constrained by `rule`. A single-letter token may
    /// end before the rule's width is reached, after `min_digits` digits.
    Block {
        token:      String,
        rule:       BlockRule,
        min_digits: usize,
    },
    /// Text the mask inserts itself
    Fixed(String),
}

/// Derived description of how to edit, render and parse a date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskConfig {
    pattern:  Pattern,
    blocks:   MaskBlocks,
    segments: Vec<Segment>,
}

/// Splits `pattern` into blocks and fixed text.
///
/// Pure in its inputs, so callers can keep the result for as long as
/// neither `blocks` nor `pattern` changes.
pub fn build_mask_config(blocks: &MaskBlocks, pattern: &Pattern) -> MaskConfig {
    let segments = pattern
        .tokens()
        .iter()
        .map(|token| match token {
            Token::Literal(text) => Segment::Fixed(text.clone()),
            Token::Field { field, width } => {
                let text = field.letter().to_string().repeat(*width);
                let rule = blocks
                    .get(&text)
                    .copied()
                    .unwrap_or_else(|| builtin_rule(*field, *width));
                let min_digits = if *width == 1 { 1 } else { rule.width() };
                Segment::Block {
                    token: text,
                    rule,
                    min_digits,
                }
            }
        })
        .collect();

    MaskConfig {
        pattern: pattern.clone(),
        blocks: blocks.clone(),
        segments,
    }
}

impl MaskConfig {
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub const fn blocks(&self) -> &MaskBlocks {
        &self.blocks
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Renders `date` under the pattern
    pub fn render(&self, date: NaiveDateTime) -> String {
        self.pattern.format(date)
    }

    /// Parses possibly incomplete `text`, filling missing fields from `reference`
    pub fn parse(&self, text: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
        parse_partial(text, &self.pattern, reference)
    }

    /// Fits raw text to the mask. Returns the conformed text and whether
    /// every block is full.
    ///
    /// Digits fill blocks left to right; a digit that would push a block out
    /// of its range is dropped. Fixed text shows up once the block after it
    /// receives a digit, or at the end when no block follows.
    ///
    /// A block short of its width ends early, and counts as full, when it
    /// holds at least `min_digits` in-range digits and the next character is
    /// the separator that follows it or a digit that would overflow it. The
    /// overflowing digit then starts the next block.
    fn conform(&self, raw: &str) -> (String, bool) {
        let mut out = String::with_capacity(raw.len());
        let mut pending = String::new();
        let mut chars = raw.chars().peekable();

        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Fixed(text) => {
                    let more_blocks = self.segments[index + 1..]
                        .iter()
                        .any(|s| matches!(s, Segment::Block { .. }));
                    if chars.peek().is_none() && more_blocks {
                        return (out, false);
                    }
                    for fixed in text.chars() {
                        if chars.peek() == Some(&fixed) {
                            chars.next();
                        }
                    }
                    pending.push_str(text);
                }
                Segment::Block {
                    token,
                    rule,
                    min_digits,
                } => {
                    let width = rule.width();
                    let separator = match self.segments.get(index + 1) {
                        Some(Segment::Fixed(text)) => text.chars().next(),
                        _ => None,
                    };
                    let block_follows = self.segments[index + 1..]
                        .iter()
                        .any(|s| matches!(s, Segment::Block { .. }));

                    let mut digits = String::with_capacity(width);
                    let mut ended_early = false;
                    while digits.len() < width {
                        let Some(&c) = chars.peek() else {
                            break;
                        };
                        let may_end = digits.len() >= *min_digits && rule.accepts_value(&digits);
                        if !c.is_ascii_digit() {
                            if may_end && separator == Some(c) {
                                ended_early = true;
                                break;
                            }
                            chars.next();
                            continue;
                        }
                        digits.push(c);
                        let short_in_range = digits.len() >= *min_digits && rule.accepts_value(&digits);
                        if short_in_range || rule.accepts_prefix(&digits) {
                            chars.next();
                            continue;
                        }
                        digits.pop();
                        if may_end && block_follows {
                            ended_early = true;
                            break;
                        }
                        chars.next();
                        trace!(token = %token, digit = %c, "digit rejected by block range");
                    }
                    if digits.is_empty() {
                        return (out, false);
                    }
                    out.push_str(&std::mem::take(&mut pending));
                    out.push_str(&digits);
                    if digits.len() < width && !ended_early {
                        return (out, false);
                    }
                }
            }
        }

        out.push_str(&pending);
        (out, true)
    }
}

/// What a change to the live buffer produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskEvent {
    /// The buffer changed; `typed` is the partial parse of the new value
    Accept {
        value: String,
        typed: Option<NaiveDateTime>,
    },
    /// Every block is full and the value parses
    Complete { value: String, typed: NaiveDateTime },
}

/// Live mask binding owning the edit buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedInput {
    config: MaskConfig,
    value:  String,
}

impl MaskedInput {
    pub const fn new(config: MaskConfig) -> Self {
        Self {
            config,
            value: String::new(),
        }
    }

    pub const fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Current mask-managed text
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Swaps in a rebuilt config and refits the buffer to it. Emits nothing.
    pub fn set_config(&mut self, config: MaskConfig) {
        self.config = config;
        let (conformed, _) = self.config.conform(&self.value);
        self.value = conformed;
    }

    /// Replaces the buffer verbatim, without conforming it or emitting events.
    /// Used when the displayed text is driven from outside the mask.
    pub fn force_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Every block of the current buffer is full
    pub fn is_complete(&self) -> bool {
        let (conformed, complete) = self.config.conform(&self.value);
        complete && conformed == self.value
    }

    /// Partial parse of the current buffer
    pub fn typed_value(&self, reference: NaiveDateTime) -> Option<NaiveDateTime> {
        self.config.parse(&self.value, reference)
    }

    /// Feeds raw edited text through the mask.
    ///
    /// Emits `Accept` when the conformed text differs from the buffer, then
    /// `Complete` when that new text fills every block and parses.
    pub fn input(&mut self, raw: &str, reference: NaiveDateTime) -> Vec<MaskEvent> {
        let (conformed, complete) = self.config.conform(raw);
        if conformed == self.value {
            return Vec::new();
        }

        self.value = conformed;
        let typed = self.typed_value(reference);
        let mut events = vec![MaskEvent::Accept {
            value: self.value.clone(),
            typed,
        }];
        if let (true, Some(typed)) = (complete, typed) {
            events.push(MaskEvent::Complete {
                value: self.value.clone(),
                typed,
            });
        }
        events
    }
}
