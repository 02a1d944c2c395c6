//! Flag-driven ISO-8601 formatting into caller supplied buffers.
//!
//! A [`FormatSpec`] is validated once and knows the exact length of every
//! string it produces, so formatting never allocates and never writes a
//! partial result.

use crate::calendar::CalendarDate;
use crate::consts::{
    DATE_SEPARATOR, MAX_DECIMAL_PLACES, MAX_TICKS, TICKS_PER_DAY, TICKS_PER_HOUR,
    TICKS_PER_MINUTE, TICKS_PER_SECOND, TIME_DESIGNATOR, TIME_SEPARATOR, WEEK_DESIGNATOR,
};
use crate::error::{Field, FormatError, ValidationError};
use crate::instant::Instant;
use crate::offset::{OffsetStyle, TimezoneOffset};
use bitflags::bitflags;

bitflags! {
    /// Fields, separators and timezone style written by a [`FormatSpec`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormatFlags: u32 {
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
        /// `Z`; the instant is always written in UTC
        const TZ_UTC = 1 << 10;
        /// `+HH`
        const TZ_HOUR = 1 << 11;
        /// `+HHMM`, or `+HH:MM` with `TIME_SEPARATORS`
        const TZ_MINUTE = 1 << 12;
        const DATE_SEPARATORS = 1 << 13;
        const TIME_SEPARATORS = 1 << 14;
    }
}

impl FormatFlags {
    pub const DATE_FIELDS: Self = Self::YEAR
        .union(Self::MONTH)
        .union(Self::DAY)
        .union(Self::ORDINAL_DAY)
        .union(Self::WEEK)
        .union(Self::WEEKDAY);
    pub const TIME_FIELDS: Self = Self::HOUR
        .union(Self::MINUTE)
        .union(Self::SECOND)
        .union(Self::FRACTION);
    pub const TZ_FIELDS: Self = Self::TZ_UTC.union(Self::TZ_HOUR).union(Self::TZ_MINUTE);

    /// `yyyy-MM-dd`
    pub const CALENDAR_DATE: Self = Self::YEAR.union(Self::MONTH).union(Self::DAY);
    /// `HH:mm:ss`
    pub const TIME: Self = Self::HOUR.union(Self::MINUTE).union(Self::SECOND);
    pub const SEPARATORS: Self = Self::DATE_SEPARATORS.union(Self::TIME_SEPARATORS);
    pub const OFFSET: Self = Self::TZ_HOUR.union(Self::TZ_MINUTE);
}

/// A validated formatting layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatSpec {
    flags: FormatFlags,
    decimal_places: u8,
    length_required: usize,
}

impl FormatSpec {
    /// `yyyy-MM-ddTHH:mm:ss.fffZ`
    pub const EXTENDED_UTC: Self = Self::precomputed(
        FormatFlags::CALENDAR_DATE
            .union(FormatFlags::TIME)
            .union(FormatFlags::FRACTION)
            .union(FormatFlags::TZ_UTC)
            .union(FormatFlags::SEPARATORS),
        3,
    );
    /// `yyyy-MM-ddTHH:mm:ss.fffffffZ`, every tick written
    pub const EXTENDED_UTC_TICKS: Self = Self::precomputed(
        FormatFlags::CALENDAR_DATE
            .union(FormatFlags::TIME)
            .union(FormatFlags::FRACTION)
            .union(FormatFlags::TZ_UTC)
            .union(FormatFlags::SEPARATORS),
        MAX_DECIMAL_PLACES,
    );
    /// `yyyy-MM-ddTHH:mm:ssZ`
    pub const EXTENDED_UTC_SECONDS: Self = Self::precomputed(
        FormatFlags::CALENDAR_DATE
            .union(FormatFlags::TIME)
            .union(FormatFlags::TZ_UTC)
            .union(FormatFlags::SEPARATORS),
        0,
    );
    /// `yyyy-MM-ddTHH:mm:ss.fff+HH:mm`
    pub const EXTENDED_OFFSET: Self = Self::precomputed(
        FormatFlags::CALENDAR_DATE
            .union(FormatFlags::TIME)
            .union(FormatFlags::FRACTION)
            .union(FormatFlags::OFFSET)
            .union(FormatFlags::SEPARATORS),
        3,
    );
    /// `yyyyMMddTHHmmss.fffZ`
    pub const BASIC_UTC: Self = Self::precomputed(
        FormatFlags::CALENDAR_DATE
            .union(FormatFlags::TIME)
            .union(FormatFlags::FRACTION)
            .union(FormatFlags::TZ_UTC),
        3,
    );
    /// `yyyyMMddTHHmmss.fff+HHmm`
    pub const BASIC_OFFSET: Self = Self::precomputed(
        FormatFlags::CALENDAR_DATE
            .union(FormatFlags::TIME)
            .union(FormatFlags::FRACTION)
            .union(FormatFlags::OFFSET),
        3,
    );
    /// `yyyy-MM-dd`
    pub const EXTENDED_DATE: Self = Self::precomputed(
        FormatFlags::CALENDAR_DATE.union(FormatFlags::DATE_SEPARATORS),
        0,
    );
    /// `yyyyMMdd`
    pub const BASIC_DATE: Self = Self::precomputed(FormatFlags::CALENDAR_DATE, 0);
    /// `yyyy-ddd`
    pub const ORDINAL_DATE: Self = Self::precomputed(
        FormatFlags::YEAR
            .union(FormatFlags::ORDINAL_DAY)
            .union(FormatFlags::DATE_SEPARATORS),
        0,
    );
    /// `yyyy-Www-D`
    pub const WEEK_DATE: Self = Self::precomputed(
        FormatFlags::YEAR
            .union(FormatFlags::WEEK)
            .union(FormatFlags::WEEKDAY)
            .union(FormatFlags::DATE_SEPARATORS),
        0,
    );

    /// Only for flag sets known to pass [`validate`].
    const fn precomputed(flags: FormatFlags, decimal_places: u8) -> Self {
        Self {
            flags,
            decimal_places,
            length_required: required_length(flags, decimal_places),
        }
    }

    /// Validates a flag combination and precomputes its output length.
    ///
    /// # Errors
    /// Returns `FormatError::InvalidFlags` for combinations whose output the
    /// parser could not read back unambiguously, and `FormatError::Invalid`
    /// when `decimal_places` is out of range for the `FRACTION` flag.
    pub fn try_create(flags: FormatFlags, decimal_places: u8) -> Result<Self, FormatError> {
        validate(flags, decimal_places).inspect_err(|_err| {
            debug!("rejected format flags {flags:?} with {decimal_places} decimal places: {_err}");
        })?;
        Ok(Self::precomputed(flags, decimal_places))
    }

    pub const fn flags(&self) -> FormatFlags {
        self.flags
    }

    /// Digits written after the decimal point (0 without `FRACTION`)
    pub const fn decimal_places(&self) -> u8 {
        self.decimal_places
    }

    /// Exact number of bytes every call to [`Self::format_into`] writes
    pub const fn length_required(&self) -> usize {
        self.length_required
    }

    /// Writes `instant` into the front of `dest` and returns the number of
    /// bytes written, which is always [`Self::length_required`].
    ///
    /// Fields are written in the local time of `offset` (UTC when `None`).
    /// With `TZ_UTC` the offset is ignored and the instant is written in UTC.
    ///
    /// # Errors
    /// Returns `FormatError::BufferTooSmall` if `dest` is shorter than
    /// [`Self::length_required`], `FormatError::OffsetNotWholeHours` if the
    /// layout writes only `+HH` and `offset` has a minute component, and
    /// `FormatError::Invalid` if applying the offset moves the instant outside
    /// the representable range. Nothing is written on error.
    pub fn format_into(
        &self,
        instant: Instant,
        dest: &mut [u8],
        offset: Option<TimezoneOffset>,
    ) -> Result<usize, FormatError> {
        let required = self.length_required;
        if dest.len() < required {
            return Err(FormatError::BufferTooSmall {
                required,
                available: dest.len(),
            });
        }

        let style = offset_style(self.flags);
        let offset = match style {
            Some(OffsetStyle::Utc) => TimezoneOffset::UTC,
            _ => offset.unwrap_or(TimezoneOffset::UTC),
        };
        // `+HH` alone would drop the minutes the fields were shifted by.
        if style == Some(OffsetStyle::Hours) && offset.abs_minutes() != 0 {
            return Err(FormatError::OffsetNotWholeHours(offset));
        }
        let local = ValidationError::check(
            Field::Ticks,
            instant.ticks() + offset.ticks(),
            0,
            MAX_TICKS,
        )?;

        let mut out = Writer {
            buf: &mut dest[..required],
            pos: 0,
        };
        let date = CalendarDate::from_days_unchecked((local / TICKS_PER_DAY) as i32);
        if self.flags.intersects(FormatFlags::DATE_FIELDS) {
            self.write_date(&mut out, date);
        }
        if self.flags.contains(FormatFlags::HOUR) {
            self.write_time(&mut out, local % TICKS_PER_DAY);
        }
        if let Some(style) = style {
            let pos = out.pos;
            out.pos += offset.write(style, &mut out.buf[pos..]);
        }
        debug_assert_eq!(out.pos, required);
        Ok(required)
    }

    /// Formats `instant` into a new string.
    ///
    /// # Errors
    /// Same as [`Self::format_into`], except that capacity never fails.
    pub fn format(
        &self,
        instant: Instant,
        offset: Option<TimezoneOffset>,
    ) -> Result<String, FormatError> {
        let mut buf = vec![0u8; self.length_required];
        let len = self.format_into(instant, &mut buf, offset)?;
        Ok(buf[..len].iter().copied().map(char::from).collect())
    }

    fn write_date(&self, out: &mut Writer<'_>, date: CalendarDate) {
        let flags = self.flags;
        let separated = flags.contains(FormatFlags::DATE_SEPARATORS);

        if flags.intersects(FormatFlags::WEEK.union(FormatFlags::WEEKDAY)) {
            // The ISO year differs from the calendar year around Jan 1st.
            let week_date = date.iso_week_date();
            out.four(week_date.year());
            out.separator(separated, DATE_SEPARATOR);
            out.byte(WEEK_DESIGNATOR);
            out.two(week_date.week());
            if flags.contains(FormatFlags::WEEKDAY) {
                out.separator(separated, DATE_SEPARATOR);
                out.byte(b'0' + week_date.weekday().iso_number());
            }
            return;
        }

        let (year, month, day) = date.to_ymd();
        out.four(year);
        if flags.contains(FormatFlags::ORDINAL_DAY) {
            out.separator(separated, DATE_SEPARATOR);
            out.three(date.ordinal());
        }
        if flags.contains(FormatFlags::MONTH) {
            out.separator(separated, DATE_SEPARATOR);
            out.two(month);
        }
        if flags.contains(FormatFlags::DAY) {
            out.separator(separated, DATE_SEPARATOR);
            out.two(day);
        }
    }

    fn write_time(&self, out: &mut Writer<'_>, ticks: i64) {
        let flags = self.flags;
        let separated = flags.contains(FormatFlags::TIME_SEPARATORS);

        out.byte(TIME_DESIGNATOR);
        out.two((ticks / TICKS_PER_HOUR) as u8);
        if flags.contains(FormatFlags::MINUTE) {
            out.separator(separated, TIME_SEPARATOR);
            out.two((ticks / TICKS_PER_MINUTE % 60) as u8);
        }
        if flags.contains(FormatFlags::SECOND) {
            out.separator(separated, TIME_SEPARATOR);
            out.two((ticks / TICKS_PER_SECOND % 60) as u8);
        }
        if flags.contains(FormatFlags::FRACTION) {
            out.byte(b'.');
            out.fraction((ticks % TICKS_PER_SECOND) as u32, self.decimal_places);
        }
    }
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self::EXTENDED_UTC
    }
}

impl TryFrom<(FormatFlags, u8)> for FormatSpec {
    type Error = FormatError;

    fn try_from((flags, decimal_places): (FormatFlags, u8)) -> Result<Self, Self::Error> {
        Self::try_create(flags, decimal_places)
    }
}

const fn offset_style(flags: FormatFlags) -> Option<OffsetStyle> {
    if flags.contains(FormatFlags::TZ_UTC) {
        Some(OffsetStyle::Utc)
    } else if flags.contains(FormatFlags::TZ_MINUTE) {
        if flags.contains(FormatFlags::TIME_SEPARATORS) {
            Some(OffsetStyle::HoursMinutesExtended)
        } else {
            Some(OffsetStyle::HoursMinutes)
        }
    } else if flags.contains(FormatFlags::TZ_HOUR) {
        Some(OffsetStyle::Hours)
    } else {
        None
    }
}

/// Output length of a validated flag set, computed field by field.
const fn required_length(flags: FormatFlags, decimal_places: u8) -> usize {
    let date_separator = flags.contains(FormatFlags::DATE_SEPARATORS) as usize;
    let time_separator = flags.contains(FormatFlags::TIME_SEPARATORS) as usize;
    let mut len = 0;

    if flags.contains(FormatFlags::YEAR) {
        len += 4;
    }
    if flags.contains(FormatFlags::MONTH) {
        len += date_separator + 2;
    }
    if flags.contains(FormatFlags::DAY) {
        len += date_separator + 2;
    }
    if flags.contains(FormatFlags::ORDINAL_DAY) {
        len += date_separator + 3;
    }
    if flags.contains(FormatFlags::WEEK) {
        len += date_separator + 3;
    }
    if flags.contains(FormatFlags::WEEKDAY) {
        len += date_separator + 1;
    }
    if flags.contains(FormatFlags::HOUR) {
        len += 3;
    }
    if flags.contains(FormatFlags::MINUTE) {
        len += time_separator + 2;
    }
    if flags.contains(FormatFlags::SECOND) {
        len += time_separator + 2;
    }
    if flags.contains(FormatFlags::FRACTION) {
        len += 1 + decimal_places as usize;
    }
    if let Some(style) = offset_style(flags) {
        len += style.len();
    }
    len
}

fn validate(flags: FormatFlags, decimal_places: u8) -> Result<(), FormatError> {
    use FormatFlags as F;

    let has_date = flags.intersects(F::DATE_FIELDS);
    let has_time = flags.intersects(F::TIME_FIELDS);
    if !has_date && !has_time {
        return Err(FormatError::InvalidFlags("at least one date or time field is required"));
    }

    if has_date {
        if !flags.contains(F::YEAR) {
            return Err(FormatError::InvalidFlags("date fields require a year"));
        }
        let layouts = [
            flags.intersects(F::MONTH.union(F::DAY)),
            flags.contains(F::ORDINAL_DAY),
            flags.intersects(F::WEEK.union(F::WEEKDAY)),
        ];
        if layouts.iter().filter(|&&on| on).count() > 1 {
            return Err(FormatError::InvalidFlags(
                "calendar, ordinal and week date fields are mutually exclusive",
            ));
        }
        if flags.contains(F::DAY) && !flags.contains(F::MONTH) {
            return Err(FormatError::InvalidFlags("a day requires a month"));
        }
        if flags.contains(F::WEEKDAY) && !flags.contains(F::WEEK) {
            return Err(FormatError::InvalidFlags("a weekday requires a week"));
        }
        if flags.contains(F::MONTH)
            && !flags.contains(F::DAY)
            && !flags.contains(F::DATE_SEPARATORS)
        {
            return Err(FormatError::InvalidFlags(
                "year and month without a day require date separators",
            ));
        }
        if has_time && !flags.intersects(F::DAY.union(F::ORDINAL_DAY).union(F::WEEKDAY)) {
            return Err(FormatError::InvalidFlags(
                "a date followed by a time needs a day, ordinal day or weekday",
            ));
        }
    }

    if has_time {
        if !flags.contains(F::HOUR) {
            return Err(FormatError::InvalidFlags("time fields require an hour"));
        }
        if flags.contains(F::SECOND) && !flags.contains(F::MINUTE) {
            return Err(FormatError::InvalidFlags("seconds require minutes"));
        }
        if flags.contains(F::FRACTION) && !flags.contains(F::SECOND) {
            return Err(FormatError::InvalidFlags("fractional seconds require seconds"));
        }
    }

    if decimal_places > MAX_DECIMAL_PLACES {
        return Err(ValidationError::out_of_range(
            Field::DecimalPlaces,
            decimal_places,
            0,
            MAX_DECIMAL_PLACES,
        )
        .into());
    }
    match (flags.contains(F::FRACTION), decimal_places) {
        (true, 0) => {
            return Err(ValidationError::out_of_range(
                Field::DecimalPlaces,
                0,
                1,
                MAX_DECIMAL_PLACES,
            )
            .into());
        }
        (false, 1..) => {
            return Err(FormatError::InvalidFlags("decimal places require fractional seconds"));
        }
        _ => {}
    }

    if flags.intersects(F::TZ_FIELDS) && !has_time {
        return Err(FormatError::InvalidFlags("a timezone requires a time"));
    }
    if flags.contains(F::TZ_MINUTE) && !flags.contains(F::TZ_HOUR) {
        return Err(FormatError::InvalidFlags("timezone minutes require timezone hours"));
    }
    if flags.contains(F::TZ_UTC) && flags.intersects(F::OFFSET) {
        return Err(FormatError::InvalidFlags(
            "the UTC designator excludes a numeric offset",
        ));
    }
    Ok(())
}

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Writer<'_> {
    fn byte(&mut self, b: u8) {
        self.buf[self.pos] = b;
        self.pos += 1;
    }

    fn separator(&mut self, enabled: bool, b: u8) {
        if enabled {
            self.byte(b);
        }
    }

    fn two(&mut self, value: u8) {
        write_2(&mut self.buf[self.pos..], value);
        self.pos += 2;
    }

    fn three(&mut self, value: u16) {
        write_3(&mut self.buf[self.pos..], value);
        self.pos += 3;
    }

    fn four(&mut self, value: u16) {
        write_4(&mut self.buf[self.pos..], value);
        self.pos += 4;
    }

    /// Leading `places` digits of a 7-digit tick fraction, truncated.
    fn fraction(&mut self, ticks: u32, places: u8) {
        let mut digits = [0u8; 7];
        write_7(&mut digits, ticks);
        let places = usize::from(places);
        self.buf[self.pos..self.pos + places].copy_from_slice(&digits[..places]);
        self.pos += places;
    }
}

// Fixed width, zero padded digit writers.

pub(crate) fn write_2(dest: &mut [u8], value: u8) {
    debug_assert!(value < 100);
    dest[0] = b'0' + value / 10;
    dest[1] = b'0' + value % 10;
}

fn write_3(dest: &mut [u8], value: u16) {
    debug_assert!(value < 1000);
    dest[0] = b'0' + (value / 100) as u8;
    write_2(&mut dest[1..], (value % 100) as u8);
}

fn write_4(dest: &mut [u8], value: u16) {
    debug_assert!(value < 10_000);
    write_2(dest, (value / 100) as u8);
    write_2(&mut dest[2..], (value % 100) as u8);
}

fn write_7(dest: &mut [u8], value: u32) {
    debug_assert!(value < 10_000_000);
    dest[0] = b'0' + (value / 1_000_000) as u8;
    write_2(&mut dest[1..], (value / 10_000 % 100) as u8);
    write_4(&mut dest[3..], (value % 10_000) as u16);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        milli: u16,
    ) -> Instant {
        Instant::from_ymd_hms_milli(year, month, day, hour, minute, second, milli)
            .expect("failed to construct test instant")
    }

    fn tz(hours: i32, minutes: i32) -> TimezoneOffset {
        TimezoneOffset::try_create(hours, minutes).expect("failed to construct test offset")
    }

    fn fmt(spec: &FormatSpec, value: Instant, offset: Option<TimezoneOffset>) -> String {
        spec.format(value, offset).expect("failed to format")
    }

    #[test]
    fn test_presets() {
        let v = instant(2020, 6, 15, 13, 5, 9, 42);
        let plus10 = Some(tz(10, 0));
        for (spec, offset, expected) in [
            (FormatSpec::EXTENDED_UTC, None, "2020-06-15T13:05:09.042Z"),
            (FormatSpec::EXTENDED_UTC, plus10, "2020-06-15T13:05:09.042Z"),
            (FormatSpec::EXTENDED_UTC_TICKS, None, "2020-06-15T13:05:09.0420000Z"),
            (FormatSpec::EXTENDED_UTC_SECONDS, None, "2020-06-15T13:05:09Z"),
            (FormatSpec::EXTENDED_OFFSET, plus10, "2020-06-15T23:05:09.042+10:00"),
            (FormatSpec::EXTENDED_OFFSET, None, "2020-06-15T13:05:09.042+00:00"),
            (FormatSpec::BASIC_UTC, None, "20200615T130509.042Z"),
            (FormatSpec::BASIC_OFFSET, Some(tz(-5, 30)), "20200615T073509.042-0530"),
            (FormatSpec::EXTENDED_DATE, None, "2020-06-15"),
            (FormatSpec::EXTENDED_DATE, plus10, "2020-06-15"),
            (FormatSpec::BASIC_DATE, None, "20200615"),
            (FormatSpec::ORDINAL_DATE, None, "2020-167"),
            (FormatSpec::WEEK_DATE, None, "2020-W25-1"),
        ] {
            let text = fmt(&spec, v, offset);
            assert_eq!(text, expected);
            assert_eq!(text.len(), spec.length_required(), "{expected}");
        }
    }

    #[test]
    fn test_presets_pass_validation() {
        for spec in [
            FormatSpec::EXTENDED_UTC,
            FormatSpec::EXTENDED_UTC_TICKS,
            FormatSpec::EXTENDED_UTC_SECONDS,
            FormatSpec::EXTENDED_OFFSET,
            FormatSpec::BASIC_UTC,
            FormatSpec::BASIC_OFFSET,
            FormatSpec::EXTENDED_DATE,
            FormatSpec::BASIC_DATE,
            FormatSpec::ORDINAL_DATE,
            FormatSpec::WEEK_DATE,
        ] {
            assert_eq!(
                FormatSpec::try_create(spec.flags(), spec.decimal_places()),
                Ok(spec)
            );
        }
        assert_eq!(FormatSpec::EXTENDED_UTC.length_required(), 24);
        assert_eq!(FormatSpec::EXTENDED_UTC_TICKS.length_required(), 28);
        assert_eq!(FormatSpec::EXTENDED_OFFSET.length_required(), 29);
    }

    #[test]
    fn test_offset_moves_the_date() {
        let v = instant(2020, 6, 15, 20, 0, 0, 0);
        assert_eq!(
            fmt(&FormatSpec::EXTENDED_DATE, v, Some(tz(10, 0))),
            "2020-06-16"
        );
        assert_eq!(
            fmt(&FormatSpec::EXTENDED_OFFSET, v, Some(tz(-14, 0))),
            "2020-06-15T06:00:00.000-14:00"
        );
    }

    #[test]
    fn test_week_date_uses_iso_year() {
        let v = instant(2010, 1, 3, 0, 0, 0, 0);
        assert_eq!(fmt(&FormatSpec::WEEK_DATE, v, None), "2009-W53-7");
        let v = instant(2008, 12, 29, 0, 0, 0, 0);
        assert_eq!(fmt(&FormatSpec::WEEK_DATE, v, None), "2009-W01-1");
        let basic = FormatSpec::try_create(
            FormatFlags::YEAR | FormatFlags::WEEK | FormatFlags::WEEKDAY | FormatFlags::HOUR,
            0,
        )
        .expect("failed to create basic week spec");
        assert_eq!(fmt(&basic, v, None), "2009W011T00");
    }

    #[test]
    fn test_fraction_digits() {
        let v = Instant::from_ticks(
            instant(2020, 1, 1, 0, 0, 0, 123).ticks() + 4567,
        )
        .expect("failed to construct instant");
        for (places, expected) in [
            (1, "00:00:00.1"),
            (2, "00:00:00.12"),
            (3, "00:00:00.123"),
            (5, "00:00:00.12345"),
            (7, "00:00:00.1234567"),
        ] {
            let spec = FormatSpec::try_create(
                FormatFlags::TIME | FormatFlags::FRACTION | FormatFlags::TIME_SEPARATORS,
                places,
            )
            .expect("failed to create time spec");
            assert_eq!(fmt(&spec, v, None), format!("T{expected}"));
        }
    }

    #[test]
    fn test_trailing_zero_padding() {
        let v = instant(2020, 1, 1, 0, 0, 0, 100);
        let spec = FormatSpec::try_create(FormatFlags::TIME | FormatFlags::FRACTION, 6)
            .expect("failed to create spec");
        assert_eq!(fmt(&spec, v, None), "T000000.100000");
    }

    #[test]
    fn test_buffer_too_small_writes_nothing() {
        let v = instant(2020, 6, 15, 13, 0, 0, 0);
        let spec = FormatSpec::EXTENDED_UTC;
        let mut buf = [b'#'; 23];
        assert_eq!(
            spec.format_into(v, &mut buf, None),
            Err(FormatError::BufferTooSmall {
                required: 24,
                available: 23
            })
        );
        assert!(buf.iter().all(|&b| b == b'#'));

        let mut buf = [b'#'; 30];
        assert_eq!(spec.format_into(v, &mut buf, None), Ok(24));
        assert_eq!(&buf[..24], b"2020-06-15T13:00:00.000Z");
        assert!(buf[24..].iter().all(|&b| b == b'#'));
    }

    #[test]
    fn test_out_of_range_after_offset_writes_nothing() {
        let mut buf = [b'#'; 29];
        let result =
            FormatSpec::EXTENDED_OFFSET.format_into(Instant::MIN, &mut buf, Some(tz(-1, 0)));
        assert!(matches!(
            result,
            Err(FormatError::Invalid(ValidationError::OutOfRange {
                field: Field::Ticks,
                ..
            }))
        ));
        assert!(buf.iter().all(|&b| b == b'#'));
        assert_eq!(
            fmt(&FormatSpec::EXTENDED_OFFSET, Instant::MAX, Some(tz(-1, 0))),
            "9999-12-31T22:59:59.999-01:00"
        );
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let v = instant(1999, 12, 31, 23, 59, 59, 999);
        let a = fmt(&FormatSpec::EXTENDED_OFFSET, v, Some(tz(5, 45)));
        let b = fmt(&FormatSpec::EXTENDED_OFFSET, v, Some(tz(5, 45)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_hour_only_offset() {
        let spec = FormatSpec::try_create(
            FormatFlags::CALENDAR_DATE
                | FormatFlags::HOUR
                | FormatFlags::TZ_HOUR
                | FormatFlags::DATE_SEPARATORS,
            0,
        )
        .expect("failed to create spec");
        assert_eq!(spec.length_required(), 16);
        let v = instant(2020, 6, 15, 13, 0, 0, 0);
        assert_eq!(fmt(&spec, v, Some(tz(10, 0))), "2020-06-15T23+10");
    }

    #[test]
    fn test_hour_only_offset_rejects_minutes() {
        let spec = FormatSpec::try_create(
            FormatFlags::CALENDAR_DATE
                | FormatFlags::HOUR
                | FormatFlags::TZ_HOUR
                | FormatFlags::DATE_SEPARATORS,
            0,
        )
        .expect("failed to create spec");
        let v = instant(2020, 6, 15, 13, 0, 0, 0);
        let half_hour = tz(-5, 30);
        let mut buf = [b'#'; 16];
        assert_eq!(
            spec.format_into(v, &mut buf, Some(half_hour)),
            Err(FormatError::OffsetNotWholeHours(half_hour))
        );
        assert!(buf.iter().all(|&b| b == b'#'));
        assert_eq!(fmt(&spec, v, Some(tz(-5, 0))), "2020-06-15T08-05");

        // Minutes are fine when the layout writes them.
        assert_eq!(
            fmt(&FormatSpec::BASIC_OFFSET, v, Some(half_hour)),
            "20200615T073000.000-0530"
        );
    }

    #[test]
    fn test_year_month_requires_separators() {
        assert_eq!(
            FormatSpec::try_create(FormatFlags::YEAR | FormatFlags::MONTH, 0),
            Err(FormatError::InvalidFlags(
                "year and month without a day require date separators"
            ))
        );
        let spec = FormatSpec::try_create(
            FormatFlags::YEAR | FormatFlags::MONTH | FormatFlags::DATE_SEPARATORS,
            0,
        )
        .expect("failed to create year-month spec");
        assert_eq!(fmt(&spec, instant(2020, 11, 5, 0, 0, 0, 0), None), "2020-11");
    }

    #[test]
    fn test_invalid_flag_combinations() {
        use FormatFlags as F;

        for (flags, decimal_places) in [
            (F::empty(), 0),
            (F::DATE_SEPARATORS, 0),
            (F::MONTH | F::DAY, 0),
            (F::YEAR | F::DAY, 0),
            (F::YEAR | F::WEEKDAY, 0),
            (F::YEAR | F::MONTH | F::DAY | F::ORDINAL_DAY, 0),
            (F::YEAR | F::ORDINAL_DAY | F::WEEK, 0),
            (F::YEAR | F::HOUR, 0),
            (F::YEAR | F::MONTH | F::DATE_SEPARATORS | F::HOUR, 0),
            (F::MINUTE, 0),
            (F::HOUR | F::SECOND, 0),
            (F::HOUR | F::MINUTE | F::FRACTION, 3),
            (F::TIME | F::FRACTION, 0),
            (F::TIME | F::FRACTION, 8),
            (F::TIME, 3),
            (F::CALENDAR_DATE | F::TZ_UTC, 0),
            (F::TIME | F::TZ_MINUTE, 0),
            (F::TIME | F::TZ_UTC | F::TZ_HOUR, 0),
        ] {
            assert!(
                FormatSpec::try_create(flags, decimal_places).is_err(),
                "{flags:?} with {decimal_places} decimal places should be rejected"
            );
        }
    }

    #[test]
    fn test_decimal_places_errors_are_range_errors() {
        assert!(matches!(
            FormatSpec::try_create(FormatFlags::TIME | FormatFlags::FRACTION, 0),
            Err(FormatError::Invalid(ValidationError::OutOfRange {
                field: Field::DecimalPlaces,
                ..
            }))
        ));
        assert!(matches!(
            FormatSpec::try_create(FormatFlags::TIME | FormatFlags::FRACTION, 8),
            Err(FormatError::Invalid(ValidationError::OutOfRange {
                field: Field::DecimalPlaces,
                value: 8,
                ..
            }))
        ));
    }

    #[test]
    fn test_digit_writers() {
        let mut buf = [0u8; 7];
        write_2(&mut buf, 7);
        assert_eq!(&buf[..2], b"07");
        write_3(&mut buf, 42);
        assert_eq!(&buf[..3], b"042");
        write_4(&mut buf, 812);
        assert_eq!(&buf[..4], b"0812");
        write_7(&mut buf, 1_234_567);
        assert_eq!(&buf, b"1234567");
        write_7(&mut buf, 50);
        assert_eq!(&buf, b"0000050");
    }
}
