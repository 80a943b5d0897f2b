// SPDX-License-Identifier: MIT

//!
//! The moment type (a timezone-resolved point in time) and its parts
//!

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;
use std::fmt;
use thiserror::Error;

/// The minimum year a [`Moment`] can fall in
pub const MIN_YEAR: i64 = -9999;

/// The maximum year a [`Moment`] can fall in
pub const MAX_YEAR: i64 = 9999;

/// Accepted layouts when parsing a local date/time string
const DATETIME_LAYOUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Errors that can arise in relation to a [`Moment`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MomentError {
    /// The day number is not allowed (must be 1 <= day <= 31)
    #[error("Day `{0}` is not allowed")]
    InvalidDay(i64),

    /// The month number is not allowed (must be 1 <= month <= 12)
    #[error("Month `{0}` is not allowed")]
    InvalidMonth(i64),

    /// The year is not allowed (must be [`MIN_YEAR`] <= year <= [`MAX_YEAR`])
    #[error("Year `{0}` is not allowed")]
    InvalidYear(i64),

    /// The packed `HHMMSS` value isn't a time of day
    #[error("Time of day `{0:06}` is not allowed")]
    InvalidTimeOfDay(i64),

    /// Each part is fine on its own but the date doesn't exist (e.g. 30 Feb)
    #[error("The date {year}-{month:02}-{day:02} does not exist")]
    InvalidDate { year: i64, month: i64, day: i64 },

    /// The local time was skipped in the timezone (e.g. a DST jump)
    #[error("The local time `{0}` does not exist in the timezone")]
    NonexistentLocalTime(String),

    /// The local time occurs twice in the timezone (e.g. a DST fall back)
    #[error("The local time `{0}` is ambiguous in the timezone")]
    AmbiguousLocalTime(String),

    /// The string couldn't be read as a date or date/time
    #[error("Could not parse `{0}` as a date/time")]
    Unparseable(String),
}

/// The day of the month
#[rustfmt::skip]
#[derive(derive_more::Display, Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub struct Day(u8);

/// The month of the year
#[rustfmt::skip]
#[derive(derive_more::Display, Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub struct Month(u8);

/// The year
///
/// The minimum year allowed is [`MIN_YEAR`].  The maximum year allowed is
/// [`MAX_YEAR`]
#[rustfmt::skip]
#[derive(derive_more::Display, Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub struct Year(i32);

/// The time of day packed as `HHMMSS` (e.g. 09:30:00 is `93000`)
///
/// Two times of day are equal exactly when their hour, minute and second are
/// all equal.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(u32);

impl Day {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Month {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Year {
    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn min() -> Self {
        Year(MIN_YEAR as i32)
    }

    pub fn max() -> Self {
        Year(MAX_YEAR as i32)
    }
}

impl TimeOfDay {
    /// 00:00:00, what a date without an entered time gets as its start
    pub const START_OF_DAY: TimeOfDay = TimeOfDay(0);

    /// 23:59:59, what a date without an entered time gets as its end
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(235959);

    /// Create a [`TimeOfDay`] from its parts if they're valid
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Result<Self, MomentError> {
        let packed = i64::from(hours) * 10000 + i64::from(minutes) * 100 + i64::from(seconds);
        if minutes > 59 || seconds > 59 {
            return Err(MomentError::InvalidTimeOfDay(packed));
        }
        TimeOfDay::try_from(packed)
    }

    /// The packed `HHMMSS` value
    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn hours(&self) -> u32 {
        self.0 / 10000
    }

    pub fn minutes(&self) -> u32 {
        (self.0 / 100) % 100
    }

    pub fn seconds(&self) -> u32 {
        self.0 % 100
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl TryFrom<i64> for Day {
    type Error = MomentError;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (1..=31).contains(&value) {
            Ok(Day(value as u8))
        } else {
            Err(MomentError::InvalidDay(value))
        }
    }
}

impl TryFrom<i64> for Month {
    type Error = MomentError;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (1..=12).contains(&value) {
            Ok(Month(value as u8))
        } else {
            Err(MomentError::InvalidMonth(value))
        }
    }
}

impl TryFrom<i64> for Year {
    type Error = MomentError;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (MIN_YEAR..=MAX_YEAR).contains(&value) {
            Ok(Year(value as i32))
        } else {
            Err(MomentError::InvalidYear(value))
        }
    }
}

impl TryFrom<i64> for TimeOfDay {
    type Error = MomentError;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let (hours, minutes, seconds) = (value / 10000, (value / 100) % 100, value % 100);
        if (0..=235959).contains(&value) && hours <= 23 && minutes <= 59 && seconds <= 59 {
            Ok(TimeOfDay(value as u32))
        } else {
            Err(MomentError::InvalidTimeOfDay(value))
        }
    }
}

/// A point in time resolved to a timezone
///
/// The calendar parts ([`Year`], [`Month`], [`Day`], [`TimeOfDay`]) are those
/// seen on a wall clock in the moment's timezone.  Equality and ordering are
/// by instant, so the same instant in two timezones compares equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Moment {
    datetime: DateTime<Tz>,
}

impl Moment {
    /// Wrap a `chrono` date/time if its year is within bounds
    pub fn new(datetime: DateTime<Tz>) -> Result<Self, MomentError> {
        Year::try_from(i64::from(datetime.year()))?;
        Ok(Moment { datetime })
    }

    /// Create a [`Moment`] from wall clock parts in the given timezone
    pub fn from(
        timezone: Tz,
        year: i64,
        month: i64,
        day: i64,
        time: TimeOfDay,
    ) -> Result<Self, MomentError> {
        let year = Year::try_from(year)?;
        let month = Month::try_from(month)?;
        let day = Day::try_from(day)?;

        let naive = NaiveDate::from_ymd_opt(
            year.value(),
            u32::from(month.value()),
            u32::from(day.value()),
        )
        .and_then(|date| date.and_hms_opt(time.hours(), time.minutes(), time.seconds()))
        .ok_or(MomentError::InvalidDate {
            year: i64::from(year.value()),
            month: i64::from(month.value()),
            day: i64::from(day.value()),
        })?;

        Self::from_local(timezone, naive)
    }

    /// Parse a local date (`2024-03-01`) or date/time (`2024-03-01 09:30`,
    /// `2024-03-01T09:30:00`) in the given timezone.  A bare date is taken
    /// to be at the start of the day.
    pub fn parse(string: &str, timezone: Tz) -> Result<Self, MomentError> {
        let string = string.trim();

        if let Some(naive) = DATETIME_LAYOUTS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(string, layout).ok())
        {
            return Self::from_local(timezone, naive);
        }

        let date = NaiveDate::parse_from_str(string, "%Y-%m-%d")
            .map_err(|_| MomentError::Unparseable(string.to_string()))?;
        Self::from_local(timezone, date.and_time(chrono::NaiveTime::MIN))
    }

    /// Resolve wall clock time to an instant, refusing skipped or doubled times
    fn from_local(timezone: Tz, naive: NaiveDateTime) -> Result<Self, MomentError> {
        match timezone.from_local_datetime(&naive) {
            LocalResult::Single(datetime) => Moment::new(datetime),
            LocalResult::Ambiguous(_, _) => {
                Err(MomentError::AmbiguousLocalTime(naive.to_string()))
            }
            LocalResult::None => Err(MomentError::NonexistentLocalTime(naive.to_string())),
        }
    }

    /// The same instant seen from another timezone
    pub fn with_timezone(&self, timezone: Tz) -> Result<Self, MomentError> {
        Moment::new(self.datetime.with_timezone(&timezone))
    }

    /// Get the [`Moment`]'s year
    pub fn year(&self) -> Year {
        Year(self.datetime.year())
    }

    /// Get the [`Moment`]'s month
    pub fn month(&self) -> Month {
        Month(self.datetime.month() as u8)
    }

    /// Get the [`Moment`]'s day
    pub fn day(&self) -> Day {
        Day(self.datetime.day() as u8)
    }

    /// Get the [`Moment`]'s time of day
    pub fn time_of_day(&self) -> TimeOfDay {
        let time = self.datetime.time();
        TimeOfDay(time.hour() * 10000 + time.minute() * 100 + time.second())
    }

    /// Get the [`Moment`]'s timezone
    pub fn timezone(&self) -> Tz {
        self.datetime.timezone()
    }

    /// Borrow the underlying `chrono` date/time
    pub fn datetime(&self) -> &DateTime<Tz> {
        &self.datetime
    }

    /// Seconds since the Unix epoch
    pub fn timestamp(&self) -> i64 {
        self.datetime.timestamp()
    }

    /// Whether both moments are the same instant, to the second
    pub fn same_instant(&self, other: &Moment) -> bool {
        self.timestamp() == other.timestamp()
    }
}
