//! Numeric date patterns in the `yyyy-MM-dd` letter style.
//!
//! Field letters: `y` year, `M` month, `d` day, `H` hour (0-23), `m`
//! minute, `s` second. Text inside single quotes is literal (`''` is an
//! apostrophe), as is every non-letter character. A quote that never
//! closes runs to the end of the pattern, so any prefix of a valid pattern
//! is itself valid.
//!
//! Tokens compile to `chrono::format::Item`s, so rendering and scanning
//! are chrono's. On top of that, parsing fills fields the input did not
//! carry from a reference date. It never fails loudly: an input that does
//! not fit the pattern yields `None`, the "invalid date" value callers
//! check before use.

use std::{fmt, str::FromStr};

use chrono::{
    Datelike, NaiveDate, NaiveDateTime, Timelike,
    format::{self as chrono_format, Item, Numeric, Pad, Parsed},
};

use crate::{
    JANUARY, MIN_DAY, PATTERN_QUOTE, PatternError,
    consts::TWO_DIGIT_YEAR_WINDOW,
};

/// Widest numeric token accepted for a year (`yyyy`).
const MAX_YEAR_WIDTH: usize = 4;
/// Widest numeric token accepted for the other fields (`MM`, `dd`...).
const MAX_FIELD_WIDTH: usize = 2;

/// Calendar or clock component named by a pattern letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'y' => Some(Self::Year),
            'M' => Some(Self::Month),
            'd' => Some(Self::Day),
            'H' => Some(Self::Hour),
            'm' => Some(Self::Minute),
            's' => Some(Self::Second),
            _ => None,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Self::Year => 'y',
            Self::Month => 'M',
            Self::Day => 'd',
            Self::Hour => 'H',
            Self::Minute => 'm',
            Self::Second => 's',
        }
    }

    const fn max_width(self) -> usize {
        match self {
            Self::Year => MAX_YEAR_WIDTH,
            _ => MAX_FIELD_WIDTH,
        }
    }
}

/// One piece of a tokenized pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Numeric field, `width` is the number of repeated letters
    Field { field: Field, width: usize },
    /// Text copied verbatim
    Literal(String),
}

impl Token {
    /// Pattern text of a field token (`"dd"`, `"yyyy"`); `None` for literals
    pub fn field_text(&self) -> Option<String> {
        match self {
            Self::Field { field, width } => Some(field.letter().to_string().repeat(*width)),
            Self::Literal(_) => None,
        }
    }

    fn item(&self) -> Item<'static> {
        let (field, width) = match self {
            Self::Literal(text) => return Item::OwnedLiteral(text.as_str().into()),
            Self::Field { field, width } => (*field, *width),
        };
        let numeric = match (field, width) {
            (Field::Year, 2) => Numeric::YearMod100,
            (Field::Year, _) => Numeric::Year,
            (Field::Month, _) => Numeric::Month,
            (Field::Day, _) => Numeric::Day,
            (Field::Hour, _) => Numeric::Hour,
            (Field::Minute, _) => Numeric::Minute,
            (Field::Second, _) => Numeric::Second,
        };
        let pad = if width == 1 { Pad::None } else { Pad::Zero };
        Item::Numeric(numeric, pad)
    }
}

/// A tokenized date pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
    items: Vec<Item<'static>>,
}

impl Pattern {
    /// Tokenizes a pattern string.
    ///
    /// # Errors
    /// Returns `PatternError::UnknownToken` for an unquoted letter that names
    /// no field and `PatternError::UnsupportedWidth` for runs like `MMMM`.
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().enumerate().peekable();

        while let Some((position, c)) = chars.next() {
            if c == PATTERN_QUOTE {
                // '' outside a quoted run is an apostrophe
                if chars.next_if(|(_, next)| *next == PATTERN_QUOTE).is_some() {
                    literal.push(PATTERN_QUOTE);
                    continue;
                }
                while let Some((_, quoted)) = chars.next() {
                    if quoted != PATTERN_QUOTE {
                        literal.push(quoted);
                    } else if chars.next_if(|(_, next)| *next == PATTERN_QUOTE).is_some() {
                        literal.push(PATTERN_QUOTE);
                    } else {
                        break;
                    }
                }
                continue;
            }

            if !c.is_ascii_alphabetic() {
                literal.push(c);
                continue;
            }

            let field = Field::from_letter(c).ok_or(PatternError::UnknownToken { token: c, position })?;
            let mut width = 1;
            while chars.next_if(|(_, next)| *next == c).is_some() {
                width += 1;
            }
            if width > field.max_width() {
                return Err(PatternError::UnsupportedWidth {
                    token: c.to_string().repeat(width),
                });
            }

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(Token::Field { field, width });
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            source: source.to_owned(),
            items: tokens.iter().map(Token::item).collect(),
            tokens,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Pattern made of the first `len` characters of this pattern's source.
    ///
    /// # Errors
    /// Returns a `PatternError` only if cutting splits a field run into a
    /// shape that fails tokenizing, which a valid source never does.
    pub fn truncated(&self, len: usize) -> Result<Self, PatternError> {
        let cut: String = self.source.chars().take(len).collect();
        Self::new(&cut)
    }

    /// Renders `date`, zero-padding each field to its token width.
    /// `yy` keeps only the last two digits of the year.
    pub fn format(&self, date: NaiveDateTime) -> String {
        date.format_with_items(self.items.iter()).to_string()
    }

    /// Parses `input` against the pattern.
    ///
    /// Fields missing from the pattern come from `reference`, except that
    /// once a larger unit is parsed every smaller missing unit resets to
    /// its minimum: `"2000"` against `yyyy` is `2000-01-01 00:00:00`
    /// whatever the reference, `"07"` against `dd` keeps the reference's
    /// month and year. Returns `None` for input that does not fit, an
    /// out-of-range field or trailing text.
    pub fn parse(&self, input: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut parsed = Parsed::new();
        chrono_format::parse(&mut parsed, input, self.items.iter()).ok()?;
        fill_from_reference(&parsed, reference)
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Resolves a two-digit year to the year closest to `reference_year`,
/// looking at most `TWO_DIGIT_YEAR_WINDOW` years ahead.
fn normalize_two_digit_year(two_digit: i32, reference_year: i32) -> i32 {
    let range_end = reference_year + TWO_DIGIT_YEAR_WINDOW;
    let range_end_century = range_end.div_euclid(100) * 100;
    if two_digit >= range_end.rem_euclid(100) {
        two_digit + range_end_century - 100
    } else {
        two_digit + range_end_century
    }
}

/// Completes what chrono scanned into a date, taking each missing unit
/// from `reference` until some larger unit was parsed, and its minimum after.
fn fill_from_reference(parsed: &Parsed, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    let year = parsed.year().or_else(|| {
        parsed
            .year_mod_100()
            .map(|two_digit| normalize_two_digit_year(two_digit, reference.year()))
    });
    let hour = parsed
        .hour_div_12()
        .zip(parsed.hour_mod_12())
        .map(|(half, hour)| half * 12 + hour);
    let smaller = [parsed.month(), parsed.day(), hour, parsed.minute(), parsed.second()];
    if year.is_none() && smaller.iter().all(Option::is_none) {
        return Some(reference);
    }

    let mut larger_parsed = year.is_some();
    let mut pick = |parsed: Option<u32>, from_reference: u32, minimum: u32| {
        let value = match parsed {
            Some(value) => value,
            None if larger_parsed => minimum,
            None => from_reference,
        };
        larger_parsed |= parsed.is_some();
        value
    };

    let [month, day, hour, minute, second] = smaller;
    let year = year.unwrap_or_else(|| reference.year());
    let month = pick(month, reference.month(), JANUARY);
    let day = pick(day, reference.day(), MIN_DAY);
    let hour = pick(hour, reference.hour(), 0);
    let minute = pick(minute, reference.minute(), 0);
    let second = pick(second, reference.second(), 0);

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Renders `date` with a pattern string.
///
/// # Errors
/// Returns a `PatternError` if `pattern` does not tokenize.
pub fn format(date: NaiveDateTime, pattern: &str) -> Result<String, PatternError> {
    Ok(Pattern::new(pattern)?.format(date))
}

/// Parses `input` with a pattern string; `None` if either does not fit.
pub fn parse(input: &str, pattern: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    Pattern::new(pattern).ok()?.parse(input, reference)
}

/// Parses a partially typed `input` against `pattern` cut to `input`'s
/// length, filling the untyped fields from `reference`.
pub fn parse_partial(input: &str, pattern: &Pattern, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    pattern
        .truncated(input.chars().count())
        .ok()?
        .parse(input, reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, midnight};

    #[test]
    fn test_tokenize() {
        let pattern = Pattern::new("dd.MM.yyyy.").unwrap();
        assert_eq!(
            pattern.tokens(),
            &[
                Token::Field {
                    field: Field::Day,
                    width: 2
                },
                Token::Literal(".".to_owned()),
                Token::Field {
                    field: Field::Month,
                    width: 2
                },
                Token::Literal(".".to_owned()),
                Token::Field {
                    field: Field::Year,
                    width: 4
                },
                Token::Literal(".".to_owned()),
            ]
        );
        assert_eq!(pattern.to_string(), "dd.MM.yyyy.");
    }

    #[test]
    fn test_tokenize_quoted_literals() {
        let pattern = Pattern::new("yyyy 'year' d''M").unwrap();
        assert_eq!(
            pattern.tokens()[1],
            Token::Literal(" year ".to_owned()),
            "quoted text merges with the surrounding spaces"
        );
        assert_eq!(pattern.tokens()[3], Token::Literal("'".to_owned()));

        let unterminated = Pattern::new("yyyy 'ye").unwrap();
        assert_eq!(unterminated.tokens()[1], Token::Literal(" ye".to_owned()));
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(
            Pattern::new("yyyy-QQ"),
            Err(PatternError::UnknownToken {
                token: 'Q',
                position: 5
            })
        );
        assert_eq!(
            Pattern::new("MMMM"),
            Err(PatternError::UnsupportedWidth {
                token: "MMMM".to_owned()
            })
        );
        assert!(Pattern::new("yyyyy").is_err());
    }

    #[test]
    fn test_field_text() {
        let pattern = Pattern::new("yyyy-M").unwrap();
        assert_eq!(pattern.tokens()[0].field_text().as_deref(), Some("yyyy"));
        assert_eq!(pattern.tokens()[1].field_text(), None);
        assert_eq!(pattern.tokens()[2].field_text().as_deref(), Some("M"));
    }

    #[test]
    fn test_format_cases() {
        let date = at(2021, 7, 7, 9, 5, 3);
        let cases = [
            ("yyyy-MM-dd", "2021-07-07"),
            ("dd.MM.yyyy.", "07.07.2021."),
            ("d/M/yy", "7/7/21"),
            ("HH:mm:ss", "09:05:03"),
            ("'on' dd", "on 07"),
            ("", ""),
        ];
        for (pattern, expected) in cases {
            assert_eq!(format(date, pattern).unwrap(), expected, "pattern {pattern}");
        }
    }

    #[test]
    fn test_parse_full_date() {
        let reference = midnight(1999, 3, 4);
        assert_eq!(
            parse("2021-07-07", "yyyy-MM-dd", reference),
            Some(midnight(2021, 7, 7))
        );
        assert_eq!(
            parse("07.07.2021 13:45", "dd.MM.yyyy HH:mm", reference),
            Some(at(2021, 7, 7, 13, 45, 0))
        );
    }

    #[test]
    fn test_parse_missing_fields_cascade() {
        struct TestCase {
            input:       &'static str,
            pattern:     &'static str,
            expected:    Option<NaiveDateTime>,
            description: &'static str,
        }

        let reference = at(2021, 8, 7, 15, 30, 0);
        let cases = [
            TestCase {
                input:       "2000",
                pattern:     "yyyy",
                expected:    Some(midnight(2000, 1, 1)),
                description: "year only resets month, day and time",
            },
            TestCase {
                input:       "2",
                pattern:     "d",
                expected:    Some(midnight(2021, 8, 2)),
                description: "day only keeps reference month and year",
            },
            TestCase {
                input:       "02-",
                pattern:     "dd-",
                expected:    Some(midnight(2021, 8, 2)),
                description: "trailing literal",
            },
            TestCase {
                input:       "2020-02",
                pattern:     "yyyy-MM",
                expected:    Some(midnight(2020, 2, 1)),
                description: "year and month reset the day",
            },
            TestCase {
                input:       "",
                pattern:     "",
                expected:    Some(reference),
                description: "empty input against empty pattern is the reference",
            },
            TestCase {
                input:       "12",
                pattern:     "HH",
                expected:    Some(at(2021, 8, 7, 12, 0, 0)),
                description: "hour only keeps the reference day",
            },
        ];

        for case in &cases {
            assert_eq!(
                parse(case.input, case.pattern, reference),
                case.expected,
                "{}",
                case.description
            );
        }
    }

    #[test]
    fn test_parse_invalid_inputs() {
        let reference = midnight(2021, 8, 7);
        let cases = [
            ("2021-13-01", "yyyy-MM-dd"),
            ("2021-02-30", "yyyy-MM-dd"),
            ("2021/02/03", "yyyy-MM-dd"),
            ("2021-02-03x", "yyyy-MM-dd"),
            ("abc", "dd"),
            ("", "dd"),
            ("x", ""),
            ("25", "HH"),
            ("07", "dd-MM-QQ"),
        ];
        for (input, pattern) in cases {
            assert_eq!(parse(input, pattern, reference), None, "{input} / {pattern}");
        }
    }

    #[test]
    fn test_parse_rejects_trailing_text() {
        let reference = midnight(2000, 1, 1);
        assert_eq!(parse("2021-07-07 ", "yyyy-MM-dd", reference), None);
        assert_eq!(parse("2021-07-070", "yyyy-MM-dd", reference), None);
        assert_eq!(
            parse(" 2021-07-07", "yyyy-MM-dd", reference),
            Some(midnight(2021, 7, 7)),
            "leading blanks before a number are skipped"
        );
    }

    #[test]
    fn test_parse_two_digit_year() {
        let reference = midnight(2021, 1, 1);
        assert_eq!(parse("21", "yy", reference), Some(midnight(2021, 1, 1)));
        assert_eq!(parse("70", "yy", reference), Some(midnight(2070, 1, 1)));
        assert_eq!(parse("71", "yy", reference), Some(midnight(1971, 1, 1)));
        assert_eq!(parse("99", "yy", reference), Some(midnight(1999, 1, 1)));
    }

    #[test]
    fn test_parse_single_letter_tokens() {
        let reference = midnight(2021, 1, 1);
        assert_eq!(parse("7/12/2021", "d/M/y", reference), Some(midnight(2021, 12, 7)));
        assert_eq!(parse("2", "y", reference), Some(midnight(2, 1, 1)));
    }

    #[test]
    fn test_parse_partial() {
        let pattern = Pattern::new("yyyy-MM-dd").unwrap();
        let reference = at(2021, 8, 7, 10, 0, 0);

        assert_eq!(parse_partial("2000", &pattern, reference), Some(midnight(2000, 1, 1)));
        assert_eq!(parse_partial("2000-05", &pattern, reference), Some(midnight(2000, 5, 1)));
        assert_eq!(parse_partial("2000-0", &pattern, reference), None, "month 0 is out of range");
    }

    #[test]
    fn test_parse_partial_day_first() {
        let pattern = Pattern::new("dd-MM-yyyy").unwrap();
        let reference = at(2021, 8, 7, 10, 0, 0);

        assert_eq!(parse_partial("2", &pattern, reference), Some(midnight(2021, 8, 2)));
        assert_eq!(parse_partial("02-09", &pattern, reference), Some(midnight(2021, 9, 2)));
        assert_eq!(parse_partial("", &pattern, reference), Some(reference));
    }
}
