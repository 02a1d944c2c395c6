//! ISO-8601 week dates.
//!
//! Week 1 of an ISO year is the week containing the year's first Thursday,
//! so the first and last few days of a calendar year can belong to a
//! neighbouring ISO year.

use crate::calendar::{days_from_ymd, CalendarDate, Weekday};
use crate::consts::{MAX_DAYS, MAX_YEAR, MIN_YEAR};
use crate::error::{Field, ValidationError};
use std::fmt;

/// An (ISO year, week, weekday) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoWeekDate {
    year: u16,
    week: u8,
    weekday: Weekday,
}

/// Weekday of Dec 31st of `year`, Sunday = 0. Also defined for year 0.
const fn dec31_weekday_from_sunday(year: i32) -> i32 {
    (year + year / 4 - year / 100 + year / 400) % 7
}

/// Number of ISO weeks (52 or 53) in `year`.
pub const fn weeks_in_year(year: u16) -> u8 {
    let y = year as i32;
    // Year ends on a Thursday, or the previous one ended on a Wednesday.
    if dec31_weekday_from_sunday(y) == 4 || dec31_weekday_from_sunday(y - 1) == 3 {
        53
    } else {
        52
    }
}

impl IsoWeekDate {
    /// Creates a validated ISO week date.
    ///
    /// # Errors
    /// Returns `ValidationError::OutOfRange` if the year is not in 1..=9999
    /// or the week is not in `1..=weeks_in_year(year)`.
    pub fn new(year: u16, week: u8, weekday: Weekday) -> Result<Self, ValidationError> {
        let year = ValidationError::check(Field::Year, year, MIN_YEAR, MAX_YEAR)?;
        let week = ValidationError::check(Field::Week, week, 1, weeks_in_year(year))?;
        Ok(Self {
            year,
            week,
            weekday,
        })
    }

    /// Projects a calendar date onto the ISO week calendar. Never fails.
    pub fn from_calendar_date(date: CalendarDate) -> Self {
        let year = date.year();
        let weekday = date.weekday();
        let week = (10 + i32::from(date.ordinal()) - i32::from(weekday.iso_number())) / 7;

        if week < 1 {
            // 0001-01-01 is a Monday, so there is always a previous year here.
            let previous = year - 1;
            Self {
                year: previous,
                week: weeks_in_year(previous),
                weekday,
            }
        } else if week > i32::from(weeks_in_year(year)) {
            Self {
                year: year + 1,
                week: 1,
                weekday,
            }
        } else {
            Self {
                year,
                week: week as u8,
                weekday,
            }
        }
    }

    /// Resolves the week date back to a calendar date.
    ///
    /// # Errors
    /// Returns `ValidationError::OutOfRange` when the date falls after
    /// 9999-12-31 (the last days of ISO year 9999 week 52).
    pub fn to_calendar_date(self) -> Result<CalendarDate, ValidationError> {
        // Jan 4th is always in week 1.
        let jan4 = days_from_ymd(self.year, 1, 4);
        let week1_monday = jan4 - i32::from(Weekday::from_days(jan4).iso_number() - 1);
        let days = week1_monday
            + (i32::from(self.week) - 1) * 7
            + i32::from(self.weekday.iso_number() - 1);
        if days > MAX_DAYS {
            return Err(ValidationError::out_of_range(Field::Day, days, 0, MAX_DAYS));
        }
        CalendarDate::from_days(i64::from(days))
    }

    /// ISO year, which differs from the calendar year around Jan 1st
    #[inline]
    pub const fn year(self) -> u16 {
        self.year
    }

    #[inline]
    pub const fn week(self) -> u8 {
        self.week
    }

    #[inline]
    pub const fn weekday(self) -> Weekday {
        self.weekday
    }
}

impl fmt::Display for IsoWeekDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-W{:02}-{}",
            self.year,
            self.week,
            self.weekday.iso_number()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week_of(year: u16, month: u8, day: u8) -> IsoWeekDate {
        CalendarDate::from_ymd(year, month, day)
            .expect("failed to construct test date")
            .iso_week_date()
    }

    fn triple(w: IsoWeekDate) -> (u16, u8, Weekday) {
        (w.year(), w.week(), w.weekday())
    }

    #[test]
    fn test_week_one_starts_in_previous_calendar_year() {
        assert_eq!(triple(week_of(2008, 12, 29)), (2009, 1, Weekday::Monday));
        assert_eq!(triple(week_of(2019, 12, 30)), (2020, 1, Weekday::Monday));
    }

    #[test]
    fn test_last_week_of_previous_iso_year() {
        assert_eq!(triple(week_of(2010, 1, 3)), (2009, 53, Weekday::Sunday));
        assert_eq!(triple(week_of(2021, 1, 1)), (2020, 53, Weekday::Friday));
        assert_eq!(triple(week_of(2023, 1, 1)), (2022, 52, Weekday::Sunday));
    }

    #[test]
    fn test_mid_year() {
        assert_eq!(triple(week_of(2020, 6, 15)), (2020, 25, Weekday::Monday));
        assert_eq!(week_of(2020, 6, 15).to_string(), "2020-W25-1");
    }

    #[test]
    fn test_weeks_in_year() {
        for (year, weeks) in [
            (2004, 53),
            (2009, 53),
            (2015, 53),
            (2020, 53),
            (2026, 53),
            (2019, 52),
            (2021, 52),
            (2022, 52),
            (1, 52),
        ] {
            assert_eq!(weeks_in_year(year), weeks, "year {year}");
        }
    }

    #[test]
    fn test_to_calendar_date() {
        let w = IsoWeekDate::new(2020, 1, Weekday::Monday).expect("failed to construct week date");
        assert_eq!(
            w.to_calendar_date(),
            CalendarDate::from_ymd(2019, 12, 30)
        );
        let w = IsoWeekDate::new(2009, 53, Weekday::Sunday).expect("failed to construct week date");
        assert_eq!(w.to_calendar_date(), CalendarDate::from_ymd(2010, 1, 3));
        assert_eq!(
            CalendarDate::from_iso_week(1, 1, 1),
            CalendarDate::from_ymd(1, 1, 1)
        );
    }

    #[test]
    fn test_rejects_invalid_week() {
        assert!(matches!(
            IsoWeekDate::new(2021, 53, Weekday::Monday),
            Err(ValidationError::OutOfRange {
                field: Field::Week,
                value: 53,
                min: 1,
                max: 52
            })
        ));
        assert!(IsoWeekDate::new(2020, 53, Weekday::Monday).is_ok());
        assert!(IsoWeekDate::new(2020, 0, Weekday::Monday).is_err());
        assert!(matches!(
            CalendarDate::from_iso_week(2020, 10, 8),
            Err(ValidationError::OutOfRange {
                field: Field::Weekday,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_dates_past_year_9999() {
        // 9999-12-31 is the Friday of week 52.
        assert_eq!(triple(week_of(9999, 12, 31)), (9999, 52, Weekday::Friday));
        assert!(CalendarDate::from_iso_week(9999, 52, 5).is_ok());
        assert!(CalendarDate::from_iso_week(9999, 52, 6).is_err());
    }

    #[test]
    fn test_round_trip_across_year_boundaries() {
        for year in [1999u16, 2000, 2004, 2008, 2009, 2010, 2020, 2100] {
            for (month, day) in [(12, 26), (12, 29), (12, 31), (1, 1), (1, 3), (1, 4)] {
                let date = CalendarDate::from_ymd(year, month, day)
                    .expect("failed to construct test date");
                assert_eq!(
                    date.iso_week_date().to_calendar_date(),
                    Ok(date),
                    "{date}"
                );
            }
        }
    }
}
