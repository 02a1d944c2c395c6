//! Proleptic Gregorian calendar math over whole days since 0001-01-01.

use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DAYS_PER_4_YEARS, DAYS_PER_100_YEARS, DAYS_PER_400_YEARS,
    DAYS_PER_YEAR, DAYS_TO_MONTH_365, DAYS_TO_MONTH_366, FEBRUARY, FEBRUARY_DAYS_LEAP,
    GREGORIAN_CYCLE, LEAP_YEAR_CYCLE, MAX_DAYS, MAX_MONTH, MAX_YEAR, MIN_DAY, MIN_YEAR,
};
use crate::error::{Field, ParseError, ValidationError};
use crate::iso_week::IsoWeekDate;
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week, Monday first as in ISO-8601.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Creates a weekday from its ISO number (Monday = 1 .. Sunday = 7).
    ///
    /// # Errors
    /// Returns `ValidationError::OutOfRange` if `number` is not in 1..=7.
    pub fn from_iso_number(number: u8) -> Result<Self, ValidationError> {
        let number = ValidationError::check(Field::Weekday, number, 1, 7)?;
        Ok(Self::ALL[usize::from(number - 1)])
    }

    /// ISO number of the weekday, Monday = 1 .. Sunday = 7
    #[inline]
    pub const fn iso_number(self) -> u8 {
        self as u8 + 1
    }

    /// Day 0 (0001-01-01) was a Monday.
    pub(crate) const fn from_days(days: i32) -> Self {
        Self::ALL[days.rem_euclid(7) as usize]
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

pub const fn days_in_year(year: u16) -> u16 {
    if is_leap_year(year) { 366 } else { 365 }
}

const fn days_to_month(year: u16) -> &'static [u16; 13] {
    if is_leap_year(year) {
        &DAYS_TO_MONTH_366
    } else {
        &DAYS_TO_MONTH_365
    }
}

/// Days from 0001-01-01 to January 1st of `year`.
pub const fn days_before_year(year: u16) -> i32 {
    let y = year as i32 - 1;
    y * DAYS_PER_YEAR + y / 4 - y / 100 + y / 400
}

/// Day number of an already validated (year, month, day).
pub const fn days_from_ymd(year: u16, month: u8, day: u8) -> i32 {
    days_before_year(year) + days_to_month(year)[month as usize - 1] as i32 + day as i32 - 1
}

/// Splits a day number into its year and zero-based day of that year.
const fn year_and_day_of_year(days: i32) -> (u16, u16) {
    let y400 = days / DAYS_PER_400_YEARS;
    let mut n = days - y400 * DAYS_PER_400_YEARS;
    // The last day of a 400 year cycle would otherwise count as a fifth century.
    let mut y100 = n / DAYS_PER_100_YEARS;
    if y100 == 4 {
        y100 = 3;
    }
    n -= y100 * DAYS_PER_100_YEARS;
    let y4 = n / DAYS_PER_4_YEARS;
    n -= y4 * DAYS_PER_4_YEARS;
    // Same for Dec 31st of a leap year inside a 4 year block.
    let mut y1 = n / DAYS_PER_YEAR;
    if y1 == 4 {
        y1 = 3;
    }
    n -= y1 * DAYS_PER_YEAR;
    let year = y400 * 400 + y100 * 100 + y4 * 4 + y1 + 1;
    (year as u16, n as u16)
}

/// Inverse of [`days_from_ymd`] for `0..=MAX_DAYS`.
pub const fn ymd_from_days(days: i32) -> (u16, u8, u8) {
    let (year, day_of_year) = year_and_day_of_year(days);
    let table = days_to_month(year);
    // Every month has at least 28 days, so `n / 32` never overshoots.
    let mut month = (day_of_year >> 5) as usize + 1;
    while day_of_year >= table[month] {
        month += 1;
    }
    let day = day_of_year - table[month - 1] + 1;
    (year, month as u8, day as u8)
}

/// A proleptic Gregorian date stored as days since 0001-01-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    days: i32,
}

impl CalendarDate {
    /// 0001-01-01
    pub const MIN: Self = Self { days: 0 };
    /// 9999-12-31
    pub const MAX: Self = Self { days: MAX_DAYS };

    /// Creates a date from a day number.
    ///
    /// # Errors
    /// Returns `ValidationError::OutOfRange` if `days` is not in `0..=MAX_DAYS`.
    pub fn from_days(days: i64) -> Result<Self, ValidationError> {
        let days = ValidationError::check(Field::Day, days, 0, i64::from(MAX_DAYS))?;
        Ok(Self::from_days_unchecked(days as i32))
    }

    pub(crate) const fn from_days_unchecked(days: i32) -> Self {
        debug_assert!(days >= 0 && days <= MAX_DAYS);
        Self { days }
    }

    /// Creates a date from year, month and day.
    ///
    /// # Errors
    /// Returns `ValidationError::OutOfRange` naming the first field outside
    /// its legal range.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self, ValidationError> {
        let year = validate_year(year)?;
        let month = ValidationError::check(Field::Month, month, 1, MAX_MONTH)?;
        let day = ValidationError::check(Field::Day, day, MIN_DAY, days_in_month(year, month))?;
        Ok(Self::from_days_unchecked(days_from_ymd(year, month, day)))
    }

    /// Creates a date from a year and a 1-based day of that year.
    ///
    /// # Errors
    /// Returns `ValidationError::OutOfRange` if the year or the ordinal is invalid.
    pub fn from_ordinal(year: u16, ordinal: u16) -> Result<Self, ValidationError> {
        let year = validate_year(year)?;
        let ordinal = ValidationError::check(Field::DayOfYear, ordinal, 1, days_in_year(year))?;
        Ok(Self::from_days_unchecked(
            days_before_year(year) + i32::from(ordinal) - 1,
        ))
    }

    /// Creates a date from an ISO week date.
    ///
    /// # Errors
    /// See [`IsoWeekDate::new`].
    pub fn from_iso_week(iso_year: u16, week: u8, weekday: u8) -> Result<Self, ValidationError> {
        IsoWeekDate::new(iso_year, week, Weekday::from_iso_number(weekday)?)
            .and_then(IsoWeekDate::to_calendar_date)
    }

    /// Days since 0001-01-01
    #[inline]
    pub const fn days(self) -> i32 {
        self.days
    }

    pub const fn to_ymd(self) -> (u16, u8, u8) {
        ymd_from_days(self.days)
    }

    pub const fn year(self) -> u16 {
        year_and_day_of_year(self.days).0
    }

    pub const fn month(self) -> u8 {
        self.to_ymd().1
    }

    pub const fn day(self) -> u8 {
        self.to_ymd().2
    }

    /// 1-based day of the year
    pub const fn ordinal(self) -> u16 {
        year_and_day_of_year(self.days).1 + 1
    }

    pub const fn weekday(self) -> Weekday {
        Weekday::from_days(self.days)
    }

    pub fn iso_week_date(self) -> IsoWeekDate {
        IsoWeekDate::from_calendar_date(self)
    }
}

fn validate_year(year: u16) -> Result<u16, ValidationError> {
    ValidationError::check(Field::Year, year, MIN_YEAR, MAX_YEAR)
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.to_ymd();
        write!(f, "{year:04}-{month:02}-{day:02}")
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    /// Accepts any ISO-8601 date grammar without a time part.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = crate::parser::parse(s)?;
        match (parsed.date, parsed.time) {
            (Some(date), None) => Ok(date.date()),
            (Some(_), Some(_)) => Err(ParseError::syntax(
                "date",
                s.trim(),
                "unexpected time component",
            )),
            (None, _) => Err(ParseError::MissingDate(s.trim().to_owned())),
        }
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
