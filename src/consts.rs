/// Minimum valid year (inclusive)
pub const MIN_YEAR: u16 = 1;
/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days elapsed before the start of each month in a common year.
/// Index `m - 1` is the offset of month `m`; index 12 is the year length.
pub(crate) const DAYS_TO_MONTH_365: [u16; 13] =
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];
/// Days elapsed before the start of each month in a leap year.
pub(crate) const DAYS_TO_MONTH_366: [u16; 13] =
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

pub(crate) const DAYS_PER_YEAR: i32 = 365;
pub(crate) const DAYS_PER_4_YEARS: i32 = DAYS_PER_YEAR * 4 + 1;
pub(crate) const DAYS_PER_100_YEARS: i32 = DAYS_PER_4_YEARS * 25 - 1;
pub(crate) const DAYS_PER_400_YEARS: i32 = DAYS_PER_100_YEARS * 4 + 1;

/// Days from 0001-01-01 to 10000-01-01
pub(crate) const DAYS_TO_10000: i32 = DAYS_PER_400_YEARS * 25 - 366;
/// Day number of 9999-12-31, the last representable date
pub const MAX_DAYS: i32 = DAYS_TO_10000 - 1;

/// One tick is 100 nanoseconds
pub const TICKS_PER_MILLISECOND: i64 = 10_000;
pub const TICKS_PER_SECOND: i64 = TICKS_PER_MILLISECOND * 1000;
pub const TICKS_PER_MINUTE: i64 = TICKS_PER_SECOND * 60;
pub const TICKS_PER_HOUR: i64 = TICKS_PER_MINUTE * 60;
pub const TICKS_PER_DAY: i64 = TICKS_PER_HOUR * 24;

/// Largest representable tick count: 9999-12-31T23:59:59.9999999
pub const MAX_TICKS: i64 = (MAX_DAYS as i64 + 1) * TICKS_PER_DAY - 1;

/// Ticks between 0001-01-01T00:00:00 and 1970-01-01T00:00:00
pub const UNIX_EPOCH_TICKS: i64 = 719_162 * TICKS_PER_DAY;

/// Offsets are bounded to +/-14 hours
pub const MAX_OFFSET_HOURS: i32 = 14;
pub const MAX_OFFSET_MINUTES: i32 = MAX_OFFSET_HOURS * 60;

/// Digits a tick fraction can carry below one second
pub const MAX_DECIMAL_PLACES: u8 = 7;

/// Date component separator (ISO 8601 extended format)
pub const DATE_SEPARATOR: u8 = b'-';
/// Time component separator (ISO 8601 extended format)
pub const TIME_SEPARATOR: u8 = b':';
/// Designator between the date and the time
pub const TIME_DESIGNATOR: u8 = b'T';
/// Designator introducing an ISO week number
pub const WEEK_DESIGNATOR: u8 = b'W';
/// UTC timezone designator
pub const UTC_DESIGNATOR: u8 = b'Z';
