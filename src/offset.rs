//! Fixed UTC offsets between -14:00 and +14:00.

use crate::consts::{MAX_OFFSET_HOURS, MAX_OFFSET_MINUTES, TICKS_PER_MINUTE};
use crate::error::{Field, ParseError, ValidationError};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A signed whole-minute offset from UTC.
///
/// Always within `-14:00..=+14:00`; an offset of 14 hours never carries
/// minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Into)]
pub struct TimezoneOffset {
    minutes: i16,
}

/// How an offset is spelled when formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetStyle {
    /// `Z`, only valid for UTC output
    Utc,
    /// `+HH`
    Hours,
    /// `+HHMM`
    HoursMinutes,
    /// `+HH:MM`
    HoursMinutesExtended,
}

impl OffsetStyle {
    pub const fn len(self) -> usize {
        match self {
            Self::Utc => 1,
            Self::Hours => 3,
            Self::HoursMinutes => 5,
            Self::HoursMinutesExtended => 6,
        }
    }
}

impl TimezoneOffset {
    pub const UTC: Self = Self { minutes: 0 };

    /// Creates an offset from hours and minutes. The minutes take the sign of
    /// the hours, so `try_create(-5, 30)` is `-05:30`.
    ///
    /// # Errors
    /// Returns `ValidationError::OutOfRange` if `|hours| > 14` or `minutes`
    /// is not in 0..=59, and `ValidationError::OffsetMinutesAtBoundary` for a
    /// non-zero `minutes` at 14 hours.
    pub fn try_create(hours: i32, minutes: i32) -> Result<Self, ValidationError> {
        Self::from_parts(hours < 0, hours.unsigned_abs(), minutes)
            .map_err(|err| match err {
                ValidationError::OffsetMinutesAtBoundary { .. } => {
                    ValidationError::OffsetMinutesAtBoundary { hours, minutes }
                }
                ValidationError::OutOfRange {
                    field: Field::OffsetHours,
                    ..
                } => ValidationError::out_of_range(
                    Field::OffsetHours,
                    hours,
                    -MAX_OFFSET_HOURS,
                    MAX_OFFSET_HOURS,
                ),
                other => other,
            })
    }

    /// Creates an offset from a signed total minute count.
    ///
    /// # Errors
    /// Returns `ValidationError::OutOfRange` if `|minutes| > 840`.
    pub fn try_from_minutes(minutes: i32) -> Result<Self, ValidationError> {
        let minutes = ValidationError::check(
            Field::OffsetMinutes,
            minutes,
            -MAX_OFFSET_MINUTES,
            MAX_OFFSET_MINUTES,
        )?;
        Ok(Self {
            minutes: minutes as i16,
        })
    }

    /// Shared by the parser, where the sign is a separate character and
    /// `-00:30` has to be representable.
    pub(crate) fn from_parts(
        negative: bool,
        hours: u32,
        minutes: i32,
    ) -> Result<Self, ValidationError> {
        if hours > MAX_OFFSET_HOURS as u32 {
            return Err(ValidationError::out_of_range(
                Field::OffsetHours,
                i64::from(hours),
                0,
                MAX_OFFSET_HOURS,
            ));
        }
        let hours = hours as i32;
        let minutes = ValidationError::check(Field::OffsetMinutes, minutes, 0, 59)?;
        if hours == MAX_OFFSET_HOURS && minutes != 0 {
            let hours = if negative { -hours } else { hours };
            return Err(ValidationError::OffsetMinutesAtBoundary { hours, minutes });
        }
        let total = hours * 60 + minutes;
        let minutes = if negative { -total } else { total };
        Ok(Self {
            minutes: minutes as i16,
        })
    }

    /// Signed offset in minutes
    #[inline]
    pub const fn total_minutes(self) -> i32 {
        self.minutes as i32
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.minutes < 0
    }

    #[inline]
    pub const fn is_utc(self) -> bool {
        self.minutes == 0
    }

    /// Hour component of the absolute offset (0..=14)
    pub const fn abs_hours(self) -> u8 {
        (self.minutes.unsigned_abs() / 60) as u8
    }

    /// Minute component of the absolute offset (0..=59)
    pub const fn abs_minutes(self) -> u8 {
        (self.minutes.unsigned_abs() % 60) as u8
    }

    /// Signed offset in ticks, added to UTC to obtain local time
    pub const fn ticks(self) -> i64 {
        self.minutes as i64 * TICKS_PER_MINUTE
    }

    /// Writes the offset in `style` to the front of `dest`, which must hold
    /// at least `style.len()` bytes.
    pub(crate) fn write(self, style: OffsetStyle, dest: &mut [u8]) -> usize {
        if style == OffsetStyle::Utc {
            dest[0] = b'Z';
            return 1;
        }
        dest[0] = if self.is_negative() { b'-' } else { b'+' };
        crate::format::write_2(&mut dest[1..], self.abs_hours());
        match style {
            OffsetStyle::HoursMinutes => crate::format::write_2(&mut dest[3..], self.abs_minutes()),
            OffsetStyle::HoursMinutesExtended => {
                dest[3] = b':';
                crate::format::write_2(&mut dest[4..], self.abs_minutes());
            }
            OffsetStyle::Utc | OffsetStyle::Hours => {}
        }
        style.len()
    }
}

impl fmt::Display for TimezoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; 6];
        let len = self.write(OffsetStyle::HoursMinutesExtended, &mut buf);
        f.write_str(std::str::from_utf8(&buf[..len]).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for TimezoneOffset {
    type Err = ParseError;

    /// Accepts `Z`, `+HH`, `+HHMM` and `+HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        crate::parser::parse_offset(trimmed)
    }
}

impl TryFrom<i32> for TimezoneOffset {
    type Error = ValidationError;

    fn try_from(minutes: i32) -> Result<Self, Self::Error> {
        Self::try_from_minutes(minutes)
    }
}

impl Serialize for TimezoneOffset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimezoneOffset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_create_valid() {
        let tz = TimezoneOffset::try_create(10, 0).expect("failed to create +10:00");
        assert_eq!(tz.total_minutes(), 600);
        let tz = TimezoneOffset::try_create(-5, 30).expect("failed to create -05:30");
        assert_eq!(tz.total_minutes(), -330);
        assert!(tz.is_negative());
        assert_eq!((tz.abs_hours(), tz.abs_minutes()), (5, 30));
        assert!(TimezoneOffset::try_create(14, 0).is_ok());
        assert!(TimezoneOffset::try_create(-14, 0).is_ok());
    }

    #[test]
    fn test_try_create_hours_out_of_range() {
        assert_eq!(
            TimezoneOffset::try_create(15, 0),
            Err(ValidationError::OutOfRange {
                field: Field::OffsetHours,
                value: 15,
                min: -14,
                max: 14
            })
        );
        assert!(TimezoneOffset::try_create(-15, 0).is_err());
    }

    #[test]
    fn test_try_create_minutes_at_boundary() {
        assert_eq!(
            TimezoneOffset::try_create(14, 30),
            Err(ValidationError::OffsetMinutesAtBoundary {
                hours: 14,
                minutes: 30
            })
        );
        assert!(TimezoneOffset::try_create(-14, 1).is_err());
    }

    #[test]
    fn test_try_create_minutes_out_of_range() {
        assert!(matches!(
            TimezoneOffset::try_create(1, 60),
            Err(ValidationError::OutOfRange {
                field: Field::OffsetMinutes,
                ..
            })
        ));
        assert!(TimezoneOffset::try_create(1, -1).is_err());
    }

    #[test]
    fn test_try_from_minutes() {
        let tz = TimezoneOffset::try_from_minutes(-30).expect("failed to create -00:30");
        assert_eq!(tz.to_string(), "-00:30");
        assert!(TimezoneOffset::try_from_minutes(841).is_err());
        assert!(TimezoneOffset::try_from(-840).is_ok());
    }

    #[test]
    fn test_ticks() {
        let tz = TimezoneOffset::try_create(-1, 0).expect("failed to create -01:00");
        assert_eq!(tz.ticks(), -36_000_000_000);
        assert_eq!(TimezoneOffset::UTC.ticks(), 0);
    }

    #[test]
    fn test_write_styles() {
        let tz = TimezoneOffset::try_create(9, 45).expect("failed to create +09:45");
        let mut buf = [0u8; 6];
        for (style, expected) in [
            (OffsetStyle::Utc, "Z"),
            (OffsetStyle::Hours, "+09"),
            (OffsetStyle::HoursMinutes, "+0945"),
            (OffsetStyle::HoursMinutesExtended, "+09:45"),
        ] {
            let len = tz.write(style, &mut buf);
            assert_eq!(len, style.len());
            assert_eq!(&buf[..len], expected.as_bytes());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(TimezoneOffset::UTC.to_string(), "+00:00");
        let tz = TimezoneOffset::try_create(-14, 0).expect("failed to create -14:00");
        assert_eq!(tz.to_string(), "-14:00");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Z".parse::<TimezoneOffset>(), Ok(TimezoneOffset::UTC));
        assert_eq!("z".parse::<TimezoneOffset>(), Ok(TimezoneOffset::UTC));
        assert_eq!(
            "+10".parse::<TimezoneOffset>(),
            TimezoneOffset::try_create(10, 0).map_err(ParseError::from)
        );
        assert_eq!(
            "-0330".parse::<TimezoneOffset>(),
            TimezoneOffset::try_create(-3, 30).map_err(ParseError::from)
        );
        assert_eq!(
            " +05:45 ".parse::<TimezoneOffset>(),
            TimezoneOffset::try_create(5, 45).map_err(ParseError::from)
        );
        assert!("+5".parse::<TimezoneOffset>().is_err());
        assert!("+05:4".parse::<TimezoneOffset>().is_err());
        assert!("05:00".parse::<TimezoneOffset>().is_err());
        assert!("+15:00".parse::<TimezoneOffset>().is_err());
        assert!("Zulu".parse::<TimezoneOffset>().is_err());
        assert_eq!("".parse::<TimezoneOffset>(), Err(ParseError::Empty));
    }

    #[test]
    fn test_serde() {
        let tz = TimezoneOffset::try_create(-3, 30).expect("failed to create -03:30");
        let json = serde_json::to_string(&tz).expect("failed to serialize offset");
        assert_eq!(json, r#""-03:30""#);
        let parsed: TimezoneOffset =
            serde_json::from_str(&json).expect("failed to deserialize offset");
        assert_eq!(parsed, tz);
    }
}
