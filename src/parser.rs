//! Turns lexed spans into validated calendar, time and offset values.

use crate::calendar::CalendarDate;
use crate::consts::{
    DATE_SEPARATOR, TICKS_PER_HOUR, TICKS_PER_MILLISECOND, TICKS_PER_MINUTE, TICKS_PER_SECOND,
    TIME_SEPARATOR,
};
use crate::error::{Field, ParseError, ValidationError};
use crate::lexer::{self, Designator, LexedRanges, Parts};
use crate::offset::TimezoneOffset;

/// A time of day with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
    millisecond: u16,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
    };

    /// # Errors
    /// Returns `ValidationError::OutOfRange` for the first field outside
    /// hour 0..=23, minute 0..=59, second 0..=59, millisecond 0..=999.
    pub fn new(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            hour: ValidationError::check(Field::Hour, hour, 0, 23)?,
            minute: ValidationError::check(Field::Minute, minute, 0, 59)?,
            second: ValidationError::check(Field::Second, second, 0, 59)?,
            millisecond: ValidationError::check(Field::Millisecond, millisecond, 0, 999)?,
        })
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }

    pub const fn second(self) -> u8 {
        self.second
    }

    pub const fn millisecond(self) -> u16 {
        self.millisecond
    }

    /// Ticks elapsed since midnight
    pub const fn ticks(self) -> i64 {
        self.hour as i64 * TICKS_PER_HOUR
            + self.minute as i64 * TICKS_PER_MINUTE
            + self.second as i64 * TICKS_PER_SECOND
            + self.millisecond as i64 * TICKS_PER_MILLISECOND
    }
}

/// A resolved date, tagged with the ISO-8601 grammar it was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateComponent {
    /// `yyyy`, `yyyy-MM`, `yyyy-MM-dd` or `yyyyMMdd`
    YearMonthDay(CalendarDate),
    /// `yyyy-ddd` or `yyyyddd`
    YearOrdinalDay(CalendarDate),
    /// `yyyy-Www[-D]` or `yyyyWww[D]`
    YearWeekDay(CalendarDate),
}

impl DateComponent {
    pub const fn date(self) -> CalendarDate {
        match self {
            Self::YearMonthDay(date) | Self::YearOrdinalDay(date) | Self::YearWeekDay(date) => date,
        }
    }
}

/// The semantic content of an ISO-8601 or RFC3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedDateTime {
    /// `None` only for time-only input such as `T10:00Z`
    pub date: Option<DateComponent>,
    pub time: Option<TimeOfDay>,
    /// `None` when the text carried no timezone designator
    pub offset: Option<TimezoneOffset>,
}

/// Parses a run of ASCII digits, rejecting anything else and overflow.
pub(crate) fn parse_digits(text: &str) -> Result<u32, ParseError> {
    text.bytes().try_fold(0u32, |acc, b| {
        if !b.is_ascii_digit() {
            return Err(ParseError::syntax("number", text, "expected ASCII digits"));
        }
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(b - b'0')))
            .ok_or_else(|| ParseError::syntax("number", text, "value too large"))
    })
}

/// Normalizes fractional second digits to milliseconds: `.1` is 100,
/// `.12` is 120 and anything past the third digit is dropped.
fn fraction_to_millis(digits: &str) -> Result<u16, ParseError> {
    let significant = &digits[..digits.len().min(3)];
    let value = parse_digits(significant)?;
    let millis = match significant.len() {
        1 => value * 100,
        2 => value * 10,
        _ => value,
    };
    Ok(millis as u16)
}

/// Fourth to seventh fraction digits as ticks; later digits are dropped.
fn fraction_sub_millis(digits: &str) -> Result<i64, ParseError> {
    let sub = digits.get(3..digits.len().min(7)).unwrap_or_default();
    let value = i64::from(parse_digits(sub)?);
    // Scale to four digits: ".1234" is 4000 ticks, ".1234567" is 4567.
    Ok(value * 10_i64.pow(4 - sub.len() as u32))
}

fn value(ranges: &LexedRanges<'_>, part: Parts) -> Result<Option<u32>, ParseError> {
    ranges.text(part).map(parse_digits).transpose()
}

// Field widths are fixed by the lexer (at most 4 digits), so the narrowing
// casts below cannot truncate.

fn resolve_date(ranges: &LexedRanges<'_>) -> Result<DateComponent, ParseError> {
    let year = value(ranges, Parts::YEAR)?.unwrap_or_default() as u16;

    if let Some(week) = value(ranges, Parts::WEEK)? {
        let weekday = value(ranges, Parts::WEEKDAY)?.unwrap_or(1);
        let date = CalendarDate::from_iso_week(year, week as u8, weekday as u8)?;
        return Ok(DateComponent::YearWeekDay(date));
    }
    if let Some(ordinal) = value(ranges, Parts::ORDINAL_DAY)? {
        let date = CalendarDate::from_ordinal(year, ordinal as u16)?;
        return Ok(DateComponent::YearOrdinalDay(date));
    }
    let month = value(ranges, Parts::MONTH)?.unwrap_or(1);
    let day = value(ranges, Parts::DAY)?.unwrap_or(1);
    let date = CalendarDate::from_ymd(year, month as u8, day as u8)?;
    Ok(DateComponent::YearMonthDay(date))
}

fn resolve_time(ranges: &LexedRanges<'_>) -> Result<TimeOfDay, ParseError> {
    let hour = value(ranges, Parts::HOUR)?.unwrap_or_default();
    let minute = value(ranges, Parts::MINUTE)?.unwrap_or_default();
    let second = value(ranges, Parts::SECOND)?.unwrap_or_default();
    let millisecond = match ranges.text(Parts::FRACTION) {
        Some(digits) => fraction_to_millis(digits)?,
        None => 0,
    };
    Ok(TimeOfDay::new(
        hour as u8,
        minute as u8,
        second as u8,
        millisecond,
    )?)
}

fn resolve_offset(ranges: &LexedRanges<'_>) -> Result<Option<TimezoneOffset>, ParseError> {
    let negative = match ranges.designator() {
        None => return Ok(None),
        Some(Designator::Utc) => return Ok(Some(TimezoneOffset::UTC)),
        Some(Designator::Plus) => false,
        Some(Designator::Minus) => true,
    };
    let hours = value(ranges, Parts::TZ_HOUR)?.unwrap_or_default();
    let minutes = value(ranges, Parts::TZ_MINUTE)?.unwrap_or_default();
    Ok(Some(TimezoneOffset::from_parts(
        negative,
        hours,
        minutes as i32,
    )?))
}

/// Parses any of the supported ISO-8601 date, time and offset grammars.
///
/// Surrounding whitespace is ignored. Missing month, day and weekday
/// default to 1.
///
/// # Errors
/// Returns the lexer's structural errors, or `ParseError::Invalid` when a
/// field is out of range (for example `2021-04-31`).
pub fn parse(input: &str) -> Result<ParsedDateTime, ParseError> {
    parse_with_sub_millis(input).map(|(parsed, _)| parsed)
}

/// Like [`parse`], but also returns the ticks the fraction carries below
/// millisecond precision (0..10_000).
pub(crate) fn parse_with_sub_millis(input: &str) -> Result<(ParsedDateTime, i64), ParseError> {
    let trimmed = input.trim();
    lexer::lex(trimmed)
        .and_then(|ranges| {
            let sub_millis = ranges.text(Parts::FRACTION).map_or(Ok(0), fraction_sub_millis)?;
            Ok((resolve(&ranges)?, sub_millis))
        })
        .inspect_err(|_err| {
            debug!("rejected {trimmed:?}: {_err}");
        })
}

fn resolve(ranges: &LexedRanges<'_>) -> Result<ParsedDateTime, ParseError> {
    let parts = ranges.parts();
    let date = if parts.contains(Parts::YEAR) {
        Some(resolve_date(ranges)?)
    } else {
        None
    };
    let time = if parts.contains(Parts::HOUR) {
        Some(resolve_time(ranges)?)
    } else {
        None
    };
    Ok(ParsedDateTime {
        date,
        time,
        offset: resolve_offset(ranges)?,
    })
}

/// Parses a standalone offset (`Z`, `+HH`, `+HHMM`, `+HH:MM`).
pub(crate) fn parse_offset(input: &str) -> Result<TimezoneOffset, ParseError> {
    let ranges = lexer::lex_offset(input)?;
    resolve_offset(&ranges)?
        .ok_or_else(|| ParseError::syntax("timezone", input, "missing designator"))
}

const RFC3339_MIN_LEN: usize = "yyyy-MM-ddTHH:mm:ssZ".len();

fn expect_byte(
    text: &str,
    index: usize,
    accept: impl Fn(u8) -> bool,
    field: &'static str,
    reason: &'static str,
) -> Result<(), ParseError> {
    if text.as_bytes().get(index).copied().is_some_and(accept) {
        Ok(())
    } else {
        Err(ParseError::syntax(field, &text[index.min(text.len())..], reason))
    }
}

fn fixed_digits(
    text: &str,
    start: usize,
    len: usize,
    field: &'static str,
) -> Result<u32, ParseError> {
    let digits = &text[start..start + len];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::syntax(field, digits, "expected digits"));
    }
    parse_digits(digits)
}

/// Parses the strict RFC3339 profile: `yyyy-MM-ddTHH:mm:ss[.f+](Z|+HH:MM)`.
///
/// Every field sits at a fixed offset so no lexing is needed. The timezone
/// is mandatory. `allow_space_for_t` additionally accepts a space between
/// the date and the time, as RFC3339 section 5.6 permits.
///
/// # Errors
/// Returns `ParseError::Syntax` for any deviation from the fixed layout, or
/// `ParseError::Invalid` for out of range values.
pub fn parse_rfc3339(input: &str, allow_space_for_t: bool) -> Result<ParsedDateTime, ParseError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    if !text.is_ascii() {
        return Err(ParseError::syntax("date-time", text, "unexpected non-ASCII character"));
    }
    if text.len() < RFC3339_MIN_LEN {
        return Err(ParseError::syntax("date-time", text, "too short for RFC3339"));
    }

    expect_byte(text, 4, |b| b == DATE_SEPARATOR, "date", "expected '-'")?;
    expect_byte(text, 7, |b| b == DATE_SEPARATOR, "date", "expected '-'")?;
    expect_byte(
        text,
        10,
        |b| b.eq_ignore_ascii_case(&b'T') || (allow_space_for_t && b == b' '),
        "date-time",
        "expected 'T'",
    )?;
    expect_byte(text, 13, |b| b == TIME_SEPARATOR, "time", "expected ':'")?;
    expect_byte(text, 16, |b| b == TIME_SEPARATOR, "time", "expected ':'")?;

    let year = fixed_digits(text, 0, 4, "year")?;
    let month = fixed_digits(text, 5, 2, "month")?;
    let day = fixed_digits(text, 8, 2, "day")?;
    let hour = fixed_digits(text, 11, 2, "hour")?;
    let minute = fixed_digits(text, 14, 2, "minute")?;
    let second = fixed_digits(text, 17, 2, "second")?;

    let bytes = text.as_bytes();
    let mut pos = 19;
    let mut millisecond = 0;
    if bytes[pos] == b'.' {
        let run = bytes[pos + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if run == 0 {
            return Err(ParseError::syntax("fraction", &text[pos..], "expected at least 1 digit"));
        }
        millisecond = fraction_to_millis(&text[pos + 1..pos + 1 + run])?;
        pos += 1 + run;
    }

    let zone = &text[pos..];
    let offset = match zone.as_bytes() {
        [b'Z' | b'z'] => TimezoneOffset::UTC,
        [sign @ (b'+' | b'-'), _, _, b':', _, _] => {
            let hours = fixed_digits(zone, 1, 2, "timezone hour")?;
            let minutes = fixed_digits(zone, 4, 2, "timezone minute")?;
            TimezoneOffset::from_parts(*sign == b'-', hours, minutes as i32)?
        }
        _ => {
            return Err(ParseError::syntax(
                "timezone",
                zone,
                "expected 'Z' or '+HH:MM'",
            ));
        }
    };

    let date = CalendarDate::from_ymd(year as u16, month as u8, day as u8)?;
    let time = TimeOfDay::new(hour as u8, minute as u8, second as u8, millisecond)?;
    Ok(ParsedDateTime {
        date: Some(DateComponent::YearMonthDay(date)),
        time: Some(time),
        offset: Some(offset),
    })
}
