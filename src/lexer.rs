//! Single pass scanner for ISO-8601 date-time text.
//!
//! The lexer only decides *where* each field is. It records an
//! `(offset, len)` span per field into the borrowed input and leaves
//! numeric interpretation and range checks to the parser.

use crate::consts::{
    DATE_SEPARATOR, TIME_DESIGNATOR, TIME_SEPARATOR, UTC_DESIGNATOR, WEEK_DESIGNATOR,
};
use crate::error::ParseError;
use bitflags::bitflags;

bitflags! {
    /// The syntactic fields found in the input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Parts: u16 {
        const YEAR = 1;
        const MONTH = 1 << 1;
        const DAY = 1 << 2;
        const ORDINAL_DAY = 1 << 3;
        const WEEK = 1 << 4;
        const WEEKDAY = 1 << 5;
        const HOUR = 1 << 6;
        const MINUTE = 1 << 7;
        const SECOND = 1 << 8;
        const FRACTION = 1 << 9;
        const TZ_HOUR = 1 << 10;
        const TZ_MINUTE = 1 << 11;
    }
}

const PART_COUNT: usize = 12;

/// Any of these ends a date precisely enough to carry a time.
const COMPLETE_DATE: Parts = Parts::DAY.union(Parts::ORDINAL_DAY).union(Parts::WEEKDAY);

/// A byte range of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

/// The character that introduced the timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Designator {
    Utc,
    Plus,
    Minus,
}

/// Field spans of one lexed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedRanges<'a> {
    input: &'a str,
    spans: [Span; PART_COUNT],
    parts: Parts,
    designator: Option<Designator>,
}

impl<'a> LexedRanges<'a> {
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            spans: [Span { offset: 0, len: 0 }; PART_COUNT],
            parts: Parts::empty(),
            designator: None,
        }
    }

    /// The text the spans point into
    pub const fn input(&self) -> &'a str {
        self.input
    }

    pub const fn parts(&self) -> Parts {
        self.parts
    }

    pub const fn designator(&self) -> Option<Designator> {
        self.designator
    }

    /// Span of a single field, if it was found.
    pub fn span(&self, part: Parts) -> Option<Span> {
        debug_assert_eq!(part.bits().count_ones(), 1);
        self.parts
            .contains(part)
            .then(|| self.spans[part.bits().trailing_zeros() as usize])
    }

    /// Text of a single field, if it was found.
    pub fn text(&self, part: Parts) -> Option<&'a str> {
        let input = self.input;
        self.span(part)
            .map(|span| &input[span.offset..span.offset + span.len])
    }

    fn record(&mut self, part: Parts, offset: usize, len: usize) {
        self.spans[part.bits().trailing_zeros() as usize] = Span { offset, len };
        self.parts |= part;
    }
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    ranges: LexedRanges<'a>,
}

const fn is_time_designator(b: u8) -> bool {
    b.eq_ignore_ascii_case(&TIME_DESIGNATOR)
}

impl<'a> Lexer<'a> {
    const fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
            ranges: LexedRanges::new(input),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn at_digit(&self) -> bool {
        self.peek().is_some_and(|b| b.is_ascii_digit())
    }

    fn at_time_designator(&self) -> bool {
        self.peek().is_some_and(is_time_designator)
    }

    /// End of the date part: end of input or the `T` before a time.
    fn at_date_end(&self) -> bool {
        self.at_end() || self.at_time_designator()
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Number of consecutive ASCII digits starting at the cursor.
    fn digit_run(&self) -> usize {
        self.bytes[self.pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    }

    fn take(&mut self, part: Parts, len: usize) {
        self.ranges.record(part, self.pos, len);
        self.pos += len;
    }

    /// Takes exactly two digits; a longer run is left for the next field.
    fn take_two(&mut self, part: Parts, field: &'static str) -> Result<(), ParseError> {
        if self.digit_run() < 2 {
            return Err(self.error(field, "expected 2 digits"));
        }
        self.take(part, 2);
        Ok(())
    }

    fn rest(&self) -> &'a str {
        let input = self.ranges.input;
        &input[self.pos.min(input.len())..]
    }

    fn error(&self, field: &'static str, reason: &'static str) -> ParseError {
        ParseError::syntax(field, self.rest(), reason)
    }

    fn inconsistent(&self, boundary: &'static str, start: usize) -> ParseError {
        let input = self.ranges.input;
        // Include the character after the mismatch, which may be multibyte.
        let end = self.pos + self.rest().chars().next().map_or(0, char::len_utf8);
        ParseError::InconsistentSeparator {
            boundary,
            text: input[start..end].to_owned(),
        }
    }

    fn lex_date(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        if self.digit_run() < 4 {
            return Err(self.error("year", "expected 4 digits"));
        }
        self.take(Parts::YEAR, 4);
        if self.at_date_end() {
            return Ok(());
        }

        let extended = self.eat(DATE_SEPARATOR);
        if self.peek().is_some_and(|b| b.eq_ignore_ascii_case(&WEEK_DESIGNATOR)) {
            self.pos += 1;
            return self.lex_week(extended, start);
        }

        let run = self.digit_run();
        if run == 3 && self.at_date_end_after(3) {
            self.take(Parts::ORDINAL_DAY, 3);
            return Ok(());
        }
        if run < 2 {
            return Err(self.error("month", "expected 2 digits"));
        }
        self.take(Parts::MONTH, 2);
        if self.at_date_end() {
            if !extended {
                // yyyyMM reads like a truncated yyMMdd; ISO-8601 only allows yyyy-MM.
                return Err(ParseError::syntax(
                    "date",
                    &self.ranges.input[start..self.pos],
                    "year and month without a day require a '-' separator",
                ));
            }
            return Ok(());
        }

        let day_separator = self.eat(DATE_SEPARATOR);
        if !day_separator && !self.at_digit() {
            return Err(self.error("date", "unexpected character"));
        }
        if day_separator != extended {
            return Err(self.inconsistent("month and day", start));
        }
        if self.digit_run() != 2 {
            return Err(self.error("day", "expected 2 digits"));
        }
        self.take(Parts::DAY, 2);
        Ok(())
    }

    fn at_date_end_after(&self, len: usize) -> bool {
        self.bytes
            .get(self.pos + len)
            .is_none_or(|&b| is_time_designator(b))
    }

    fn lex_week(&mut self, extended: bool, start: usize) -> Result<(), ParseError> {
        self.take_two(Parts::WEEK, "week")?;
        if self.at_date_end() {
            return Ok(());
        }

        let weekday_separator = self.eat(DATE_SEPARATOR);
        if !weekday_separator && !self.at_digit() {
            return Err(self.error("week date", "unexpected character"));
        }
        if weekday_separator != extended {
            return Err(self.inconsistent("week and weekday", start));
        }
        if self.digit_run() != 1 {
            return Err(self.error("weekday", "expected 1 digit"));
        }
        self.take(Parts::WEEKDAY, 1);
        Ok(())
    }

    fn lex_time(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.take_two(Parts::HOUR, "hour")?;

        let extended = self.eat(TIME_SEPARATOR);
        if extended || self.at_digit() {
            self.take_two(Parts::MINUTE, "minute")?;

            let second_separator = self.eat(TIME_SEPARATOR);
            if second_separator || self.at_digit() {
                if second_separator != extended {
                    return Err(self.inconsistent("minute and second", start));
                }
                self.take_two(Parts::SECOND, "second")?;
            }
        }

        if matches!(self.peek(), Some(b'.' | b',')) {
            if !self.ranges.parts.contains(Parts::SECOND) {
                return Err(self.error("fraction", "fractional seconds require seconds"));
            }
            self.pos += 1;
            let run = self.digit_run();
            if run == 0 {
                return Err(self.error("fraction", "expected at least 1 digit"));
            }
            self.take(Parts::FRACTION, run);
        }

        self.lex_offset()
    }

    fn lex_offset(&mut self) -> Result<(), ParseError> {
        let Some(b) = self.peek() else {
            return Ok(());
        };
        let designator = match b {
            _ if b.eq_ignore_ascii_case(&UTC_DESIGNATOR) => Designator::Utc,
            b'+' => Designator::Plus,
            b'-' => Designator::Minus,
            _ => return Err(self.error("timezone", "expected 'Z', '+' or '-'")),
        };
        self.pos += 1;
        self.ranges.designator = Some(designator);
        if designator == Designator::Utc {
            return Ok(());
        }

        self.take_two(Parts::TZ_HOUR, "timezone hour")?;
        if self.eat(TIME_SEPARATOR) || self.at_digit() {
            self.take_two(Parts::TZ_MINUTE, "timezone minute")?;
        }
        Ok(())
    }

    fn finish(self) -> Result<LexedRanges<'a>, ParseError> {
        if !self.at_end() {
            return Err(self.error("date-time", "unexpected trailing characters"));
        }
        Ok(self.ranges)
    }
}

/// Splits ISO-8601 date-time text into field spans.
///
/// # Errors
/// Returns `ParseError::Syntax` or `ParseError::InconsistentSeparator`
/// describing the first structural problem.
pub fn lex(input: &str) -> Result<LexedRanges<'_>, ParseError> {
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut lexer = Lexer::new(input);
    if !lexer.at_time_designator() {
        lexer.lex_date()?;
        if lexer.at_time_designator() && !lexer.ranges.parts.intersects(COMPLETE_DATE) {
            return Err(ParseError::syntax(
                "date",
                &input[..lexer.pos],
                "a time must follow a complete date",
            ));
        }
    }
    if lexer.at_time_designator() {
        lexer.pos += 1;
        lexer.lex_time()?;
    }
    let ranges = lexer.finish()?;
    trace!("lexed {:?} into {:?}", input, ranges.parts);
    Ok(ranges)
}

/// Lexes a standalone `Z`, `+HH`, `+HHMM` or `+HH:MM`.
pub(crate) fn lex_offset(input: &str) -> Result<LexedRanges<'_>, ParseError> {
    let mut lexer = Lexer::new(input);
    if lexer.at_end() {
        return Err(ParseError::Empty);
    }
    lexer.lex_offset()?;
    lexer.finish()
}
