//! ISO-8601 and RFC3339 date-time parsing and formatting over a 100 ns tick
//! [`Instant`] in the proleptic Gregorian calendar, years 1 through 9999.
//!
//! ```
//! use iso_instant::{FormatSpec, Instant, TimezoneOffset};
//!
//! let instant = Instant::parse_iso8601("2020-06-15T23+10:00", None).unwrap();
//! assert_eq!(instant.to_string(), "2020-06-15T13:00:00.000Z");
//!
//! let tokyo = TimezoneOffset::try_create(9, 0).unwrap();
//! let text = instant.format(&FormatSpec::EXTENDED_OFFSET, Some(tokyo)).unwrap();
//! assert_eq!(text, "2020-06-15T22:00:00.000+09:00");
//! ```

#[macro_use]
mod logging;

mod calendar;
mod consts;
mod error;
mod format;
mod instant;
mod iso_week;
mod lexer;
mod offset;
mod parser;
mod prelude;

pub use calendar::{
    days_before_year, days_from_ymd, days_in_month, days_in_year, is_leap_year, ymd_from_days,
    CalendarDate, Weekday,
};
pub use consts::*;
pub use error::{Field, FormatError, ParseError, ValidationError};
pub use format::{FormatFlags, FormatSpec};
pub use instant::{DateTimeUnit, Instant};
pub use iso_week::{weeks_in_year, IsoWeekDate};
pub use lexer::{lex, Designator, LexedRanges, Parts, Span};
pub use offset::{OffsetStyle, TimezoneOffset};
pub use parser::{parse, parse_rfc3339, DateComponent, ParsedDateTime, TimeOfDay};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_date_with_default_utc() {
        let instant = Instant::parse_iso8601("2020-W01", Some(TimezoneOffset::UTC))
            .expect("failed to parse week date");
        assert_eq!(
            instant.format(&FormatSpec::EXTENDED_DATE, None),
            Ok("2019-12-30".to_owned())
        );
    }

    #[test]
    fn test_hour_only_time_with_offset() {
        let instant = Instant::parse_iso8601("2020-06-15T23+10:00", None)
            .expect("failed to parse hour-only time");
        assert_eq!(
            instant.format(&FormatSpec::EXTENDED_UTC_SECONDS, None),
            Ok("2020-06-15T13:00:00Z".to_owned())
        );
    }

    #[test]
    fn test_offset_boundaries() {
        assert!(matches!(
            TimezoneOffset::try_create(15, 0),
            Err(ValidationError::OutOfRange {
                field: Field::OffsetHours,
                ..
            })
        ));
        assert_eq!(
            TimezoneOffset::try_create(14, 30),
            Err(ValidationError::OffsetMinutesAtBoundary {
                hours: 14,
                minutes: 30
            })
        );
    }

    #[test]
    fn test_year_month_ambiguity() {
        assert!(Instant::parse_iso8601("202011", Some(TimezoneOffset::UTC)).is_err());
        assert_eq!(
            Instant::parse_iso8601("2020-11", Some(TimezoneOffset::UTC)),
            Instant::from_ymd(2020, 11, 1).map_err(ParseError::from)
        );
    }

    #[test]
    fn test_leap_day_acceptance_matches_rule() {
        for year in 1..=2400u16 {
            let leap = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
            assert_eq!(is_leap_year(year), leap);
            assert_eq!(Instant::from_ymd(year, 2, 29).is_ok(), leap, "year {year}");
        }
    }

    #[test]
    fn test_formats_parse_back() {
        let instant = Instant::from_ymd_hms_milli(2021, 1, 3, 4, 5, 6, 7)
            .expect("failed to construct instant");
        let truncated = instant.truncate(DateTimeUnit::Second);
        for (spec, expected) in [
            (FormatSpec::EXTENDED_UTC, instant),
            (FormatSpec::BASIC_UTC, instant),
            (FormatSpec::EXTENDED_UTC_SECONDS, truncated),
            (FormatSpec::EXTENDED_OFFSET, instant),
            (FormatSpec::BASIC_OFFSET, instant),
        ] {
            let text = instant.format(&spec, None).expect("failed to format");
            assert_eq!(Instant::parse_iso8601(&text, None), Ok(expected), "{text}");
        }
        for spec in [
            FormatSpec::EXTENDED_DATE,
            FormatSpec::BASIC_DATE,
            FormatSpec::ORDINAL_DATE,
            FormatSpec::WEEK_DATE,
        ] {
            let text = instant.format(&spec, None).expect("failed to format");
            assert_eq!(
                Instant::parse_iso8601(&text, Some(TimezoneOffset::UTC)),
                Ok(instant.truncate(DateTimeUnit::Day)),
                "{text}"
            );
        }
    }
}
