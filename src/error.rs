//! Error types shared by the calendar, parsing and formatting layers.

use crate::offset::TimezoneOffset;
use crate::prelude::*;

/// Names the value a [`ValidationError`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Field {
    #[display(fmt = "year")]
    Year,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "day")]
    Day,
    #[display(fmt = "day of year")]
    DayOfYear,
    #[display(fmt = "week")]
    Week,
    #[display(fmt = "weekday")]
    Weekday,
    #[display(fmt = "hour")]
    Hour,
    #[display(fmt = "minute")]
    Minute,
    #[display(fmt = "second")]
    Second,
    #[display(fmt = "millisecond")]
    Millisecond,
    #[display(fmt = "timezone offset hours")]
    OffsetHours,
    #[display(fmt = "timezone offset minutes")]
    OffsetMinutes,
    #[display(fmt = "decimal places")]
    DecimalPlaces,
    #[display(fmt = "ticks")]
    Ticks,
}

/// A numeric value that is outside its legal range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The value does not fall within `min..=max`.
    #[error("{field} {value} is out of range (must be {min}..={max})")]
    OutOfRange {
        field: Field,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A +/-14 hour offset carried a non-zero minute component.
    #[error("timezone offset {hours:+03}:{minutes:02} exceeds 14:00 (minutes must be 0 at 14h)")]
    OffsetMinutesAtBoundary { hours: i32, minutes: i32 },

    /// Intermediate arithmetic left the range of the backing integer.
    #[error("arithmetic overflow while computing {field}")]
    Overflow { field: Field },
}

impl ValidationError {
    pub(crate) fn out_of_range(
        field: Field,
        value: impl Into<i64>,
        min: impl Into<i64>,
        max: impl Into<i64>,
    ) -> Self {
        Self::OutOfRange {
            field,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        }
    }

    /// Fails with [`ValidationError::OutOfRange`] unless `min <= value <= max`.
    pub(crate) fn check<T>(field: Field, value: T, min: T, max: T) -> Result<T, Self>
    where
        T: PartialOrd + Copy + Into<i64>,
    {
        if value < min || value > max {
            return Err(Self::out_of_range(field, value, min, max));
        }
        Ok(value)
    }
}

/// Error returned when ISO-8601 or RFC3339 text cannot be turned into a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Nothing but whitespace was supplied.
    #[error("Empty date-time string")]
    Empty,

    /// A field is malformed (wrong width, unexpected character, ...).
    #[error("Invalid {field} at '{text}': {reason}")]
    Syntax {
        field: &'static str,
        text: String,
        reason: &'static str,
    },

    /// A separator was present on one side of a field and absent on the other.
    #[error("Inconsistent separator between {boundary} at '{text}'")]
    InconsistentSeparator { boundary: &'static str, text: String },

    /// The input only carried a time of day.
    #[error("Date-time string has no date: {0}")]
    MissingDate(String),

    /// The input had no timezone designator and no default was supplied.
    #[error("Date-time string has no timezone designator: {0}")]
    MissingTimezone(String),

    /// The text was well formed but a value is out of range.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl ParseError {
    pub(crate) fn syntax(field: &'static str, text: &str, reason: &'static str) -> Self {
        Self::Syntax {
            field,
            text: text.to_owned(),
            reason,
        }
    }
}

/// Error returned by [`crate::FormatSpec`] construction and formatting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The flag combination cannot produce parseable output.
    #[error("Invalid format flags: {0}")]
    InvalidFlags(&'static str),

    /// The destination cannot hold the formatted text. Nothing was written.
    #[error("Destination buffer too small: {required} bytes required, {available} available")]
    BufferTooSmall { required: usize, available: usize },

    /// The layout writes `+HH` only, which cannot express this offset.
    #[error("Timezone offset {0} has minutes but the format only writes hours")]
    OffsetNotWholeHours(TimezoneOffset),

    /// A value (decimal places, or the instant shifted by its offset) is out of range.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl FormatError {
    /// Length the destination must have, when this is a capacity error.
    pub const fn required_length(&self) -> Option<usize> {
        match self {
            Self::BufferTooSmall { required, .. } => Some(*required),
            Self::InvalidFlags(_) | Self::OffsetNotWholeHours(_) | Self::Invalid(_) => None,
        }
    }
}
