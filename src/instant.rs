//! The scalar point in time everything else resolves to.

use crate::calendar::{days_in_month, CalendarDate, Weekday};
use crate::consts::{
    JANUARY, MAX_MONTH, MAX_TICKS, MAX_YEAR, MIN_DAY, MIN_YEAR, TICKS_PER_DAY, TICKS_PER_HOUR,
    TICKS_PER_MILLISECOND, TICKS_PER_MINUTE, TICKS_PER_SECOND, UNIX_EPOCH_TICKS,
};
use crate::error::{Field, FormatError, ParseError, ValidationError};
use crate::format::FormatSpec;
use crate::iso_week::IsoWeekDate;
use crate::offset::TimezoneOffset;
use crate::parser::{self, ParsedDateTime, TimeOfDay};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A UTC instant between 0001-01-01T00:00:00 and 9999-12-31T23:59:59.9999999,
/// stored as 100 ns ticks since the start of year 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Into)]
pub struct Instant {
    ticks: i64,
}

/// Granularity for [`Instant::truncate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DateTimeUnit {
    #[display(fmt = "year")]
    Year,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "day")]
    Day,
    #[display(fmt = "hour")]
    Hour,
    #[display(fmt = "minute")]
    Minute,
    #[display(fmt = "second")]
    Second,
    #[display(fmt = "millisecond")]
    Millisecond,
}

impl Instant {
    pub const MIN: Self = Self { ticks: 0 };
    pub const MAX: Self = Self { ticks: MAX_TICKS };
    /// 1970-01-01T00:00:00Z
    pub const UNIX_EPOCH: Self = Self {
        ticks: UNIX_EPOCH_TICKS,
    };

    /// # Errors
    /// Returns `ValidationError::OutOfRange` if `ticks` is not in `0..=MAX_TICKS`.
    pub fn from_ticks(ticks: i64) -> Result<Self, ValidationError> {
        let ticks = ValidationError::check(Field::Ticks, ticks, 0, MAX_TICKS)?;
        Ok(Self { ticks })
    }

    /// Midnight UTC of the given date.
    pub const fn from_date(date: CalendarDate) -> Self {
        Self {
            ticks: date.days() as i64 * TICKS_PER_DAY,
        }
    }

    /// # Errors
    /// Returns `ValidationError::OutOfRange` for an invalid date.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self, ValidationError> {
        CalendarDate::from_ymd(year, month, day).map(Self::from_date)
    }

    /// # Errors
    /// Returns `ValidationError::OutOfRange` for an invalid date or time.
    pub fn from_ymd_hms(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, ValidationError> {
        Self::from_ymd_hms_milli(year, month, day, hour, minute, second, 0)
    }

    /// # Errors
    /// Returns `ValidationError::OutOfRange` for an invalid date or time.
    pub fn from_ymd_hms_milli(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
    ) -> Result<Self, ValidationError> {
        let date = CalendarDate::from_ymd(year, month, day)?;
        let time = TimeOfDay::new(hour, minute, second, millisecond)?;
        Ok(Self::from_date_time(date, time))
    }

    const fn from_date_time(date: CalendarDate, time: TimeOfDay) -> Self {
        Self {
            ticks: date.days() as i64 * TICKS_PER_DAY + time.ticks(),
        }
    }

    #[inline]
    pub const fn ticks(self) -> i64 {
        self.ticks
    }

    pub const fn date(self) -> CalendarDate {
        CalendarDate::from_days_unchecked((self.ticks / TICKS_PER_DAY) as i32)
    }

    pub const fn year(self) -> u16 {
        self.date().year()
    }

    pub const fn month(self) -> u8 {
        self.date().month()
    }

    pub const fn day(self) -> u8 {
        self.date().day()
    }

    /// 1..=366
    pub const fn day_of_year(self) -> u16 {
        self.date().ordinal()
    }

    pub const fn weekday(self) -> Weekday {
        self.date().weekday()
    }

    pub fn iso_week_date(self) -> IsoWeekDate {
        self.date().iso_week_date()
    }

    /// Ticks elapsed since midnight
    #[inline]
    pub const fn time_of_day_ticks(self) -> i64 {
        self.ticks % TICKS_PER_DAY
    }

    pub const fn hour(self) -> u8 {
        (self.time_of_day_ticks() / TICKS_PER_HOUR) as u8
    }

    pub const fn minute(self) -> u8 {
        (self.ticks / TICKS_PER_MINUTE % 60) as u8
    }

    pub const fn second(self) -> u8 {
        (self.ticks / TICKS_PER_SECOND % 60) as u8
    }

    pub const fn millisecond(self) -> u16 {
        (self.ticks / TICKS_PER_MILLISECOND % 1000) as u16
    }

    /// Adds calendar years, clamping Feb 29th to Feb 28th in common years.
    ///
    /// # Errors
    /// Returns `ValidationError::OutOfRange` if the resulting year is not in
    /// 1..=9999.
    pub fn add_years(self, years: i32) -> Result<Self, ValidationError> {
        let months = i64::from(years)
            .checked_mul(i64::from(MAX_MONTH))
            .ok_or(ValidationError::Overflow { field: Field::Year })?;
        self.add_months_i64(months)
    }

    /// Adds calendar months, clamping the day to the length of the target
    /// month. The time of day is preserved.
    ///
    /// # Errors
    /// Returns `ValidationError::OutOfRange` if the resulting year is not in
    /// 1..=9999.
    pub fn add_months(self, months: i32) -> Result<Self, ValidationError> {
        self.add_months_i64(i64::from(months))
    }

    fn add_months_i64(self, months: i64) -> Result<Self, ValidationError> {
        let (year, month, day) = self.date().to_ymd();
        // Zero-based month index counted from year 0.
        let index = i64::from(year) * 12 + i64::from(month - 1) + months;
        let year = ValidationError::check(
            Field::Year,
            index.div_euclid(12),
            i64::from(MIN_YEAR),
            i64::from(MAX_YEAR),
        )? as u16;
        let month = index.rem_euclid(12) as u8 + 1;
        let day = day.min(days_in_month(year, month));
        let date = CalendarDate::from_ymd(year, month, day)?;
        Ok(Self {
            ticks: Self::from_date(date).ticks + self.time_of_day_ticks(),
        })
    }

    /// # Errors
    /// Fails if the result leaves the representable range.
    pub fn add_days(self, days: i64) -> Result<Self, ValidationError> {
        self.add_scaled(days, TICKS_PER_DAY, Field::Day)
    }

    /// # Errors
    /// Fails if the result leaves the representable range.
    pub fn add_hours(self, hours: i64) -> Result<Self, ValidationError> {
        self.add_scaled(hours, TICKS_PER_HOUR, Field::Hour)
    }

    /// # Errors
    /// Fails if the result leaves the representable range.
    pub fn add_minutes(self, minutes: i64) -> Result<Self, ValidationError> {
        self.add_scaled(minutes, TICKS_PER_MINUTE, Field::Minute)
    }

    /// # Errors
    /// Fails if the result leaves the representable range.
    pub fn add_seconds(self, seconds: i64) -> Result<Self, ValidationError> {
        self.add_scaled(seconds, TICKS_PER_SECOND, Field::Second)
    }

    /// # Errors
    /// Fails if the result leaves the representable range.
    pub fn add_milliseconds(self, milliseconds: i64) -> Result<Self, ValidationError> {
        self.add_scaled(milliseconds, TICKS_PER_MILLISECOND, Field::Millisecond)
    }

    /// # Errors
    /// Returns `ValidationError::Overflow` if the sum does not fit in an
    /// `i64`, and `ValidationError::OutOfRange` if it is outside
    /// `0..=MAX_TICKS`.
    pub fn add_ticks(self, ticks: i64) -> Result<Self, ValidationError> {
        let sum = self
            .ticks
            .checked_add(ticks)
            .ok_or(ValidationError::Overflow { field: Field::Ticks })?;
        Self::from_ticks(sum)
    }

    fn add_scaled(self, amount: i64, unit: i64, field: Field) -> Result<Self, ValidationError> {
        let ticks = amount
            .checked_mul(unit)
            .ok_or(ValidationError::Overflow { field })?;
        self.add_ticks(ticks)
    }

    /// Zeroes every field finer than `unit`.
    pub fn truncate(self, unit: DateTimeUnit) -> Self {
        let ticks = self.ticks;
        let (year, month, _) = self.date().to_ymd();
        let ticks = match unit {
            DateTimeUnit::Year => Self::first_day(year, JANUARY),
            DateTimeUnit::Month => Self::first_day(year, month),
            DateTimeUnit::Day => ticks - ticks % TICKS_PER_DAY,
            DateTimeUnit::Hour => ticks - ticks % TICKS_PER_HOUR,
            DateTimeUnit::Minute => ticks - ticks % TICKS_PER_MINUTE,
            DateTimeUnit::Second => ticks - ticks % TICKS_PER_SECOND,
            DateTimeUnit::Millisecond => ticks - ticks % TICKS_PER_MILLISECOND,
        };
        Self { ticks }
    }

    const fn first_day(year: u16, month: u8) -> i64 {
        crate::calendar::days_from_ymd(year, month, MIN_DAY) as i64 * TICKS_PER_DAY
    }

    /// Signed tick delta `self - other`.
    #[inline]
    pub const fn difference(self, other: Self) -> i64 {
        self.ticks - other.ticks
    }

    /// Parses any supported ISO-8601 date-time.
    ///
    /// A missing time means midnight. Input without a timezone designator is
    /// read in `default_offset`.
    ///
    /// # Errors
    /// Returns `ParseError::MissingDate` for time-only input,
    /// `ParseError::MissingTimezone` when there is neither a designator nor a
    /// default, and any lexing or range error from the parser.
    pub fn parse_iso8601(
        text: &str,
        default_offset: Option<TimezoneOffset>,
    ) -> Result<Self, ParseError> {
        let parsed = parser::parse(text)?;
        Self::from_parsed(text, parsed, default_offset)
    }

    /// Parses the strict RFC3339 profile, optionally accepting a space in
    /// place of `T`.
    ///
    /// # Errors
    /// Returns `ParseError::Syntax` for any deviation from the RFC3339 layout
    /// and `ParseError::Invalid` for out of range values.
    pub fn parse_rfc3339(text: &str, allow_space_for_t: bool) -> Result<Self, ParseError> {
        let parsed = parser::parse_rfc3339(text, allow_space_for_t)?;
        Self::from_parsed(text, parsed, None)
    }

    fn from_parsed(
        text: &str,
        parsed: ParsedDateTime,
        default_offset: Option<TimezoneOffset>,
    ) -> Result<Self, ParseError> {
        let date = parsed
            .date
            .ok_or_else(|| ParseError::MissingDate(text.trim().to_owned()))?;
        let offset = parsed
            .offset
            .or(default_offset)
            .ok_or_else(|| ParseError::MissingTimezone(text.trim().to_owned()))?;
        let local = Self::from_date_time(date.date(), parsed.time.unwrap_or(TimeOfDay::MIDNIGHT));
        Ok(Self::from_ticks(local.ticks - offset.ticks())?)
    }

    /// Formats into a new string; see [`FormatSpec::format_into`].
    ///
    /// # Errors
    /// Returns `FormatError::Invalid` if the offset moves the instant out of
    /// range.
    pub fn format(
        self,
        spec: &FormatSpec,
        offset: Option<TimezoneOffset>,
    ) -> Result<String, FormatError> {
        spec.format(self, offset)
    }

    /// Formats into the front of `dest` and returns the number of bytes
    /// written; see [`FormatSpec::format_into`].
    ///
    /// # Errors
    /// Returns `FormatError::BufferTooSmall` when `dest` is shorter than
    /// `spec.length_required()`. Nothing is written on error.
    pub fn format_into(
        self,
        spec: &FormatSpec,
        dest: &mut [u8],
        offset: Option<TimezoneOffset>,
    ) -> Result<usize, FormatError> {
        spec.format_into(self, dest, offset)
    }
}

impl Default for Instant {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<CalendarDate> for Instant {
    fn from(date: CalendarDate) -> Self {
        Self::from_date(date)
    }
}

impl TryFrom<i64> for Instant {
    type Error = ValidationError;

    fn try_from(ticks: i64) -> Result<Self, Self::Error> {
        Self::from_ticks(ticks)
    }
}

impl fmt::Display for Instant {
    /// `yyyy-MM-ddTHH:mm:ss.fffZ`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = FormatSpec::EXTENDED_UTC;
        let mut buf = [0u8; 24];
        let len = spec
            .format_into(*self, &mut buf, None)
            .map_err(|_| fmt::Error)?;
        f.write_str(std::str::from_utf8(&buf[..len]).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for Instant {
    type Err = ParseError;

    /// Any ISO-8601 date-time with an explicit timezone designator. Unlike
    /// [`Instant::parse_iso8601`], up to seven fraction digits are kept.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (parsed, sub_millis) = parser::parse_with_sub_millis(s)?;
        Ok(Self::from_parsed(s, parsed, None)?.add_ticks(sub_millis)?)
    }
}

impl Serialize for Instant {
    /// `yyyy-MM-ddTHH:mm:ss.fffffffZ`, so every tick survives a round trip.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let text = FormatSpec::EXTENDED_UTC_TICKS
            .format(*self, None)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
