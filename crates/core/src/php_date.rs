// SPDX-License-Identifier: MIT

//!
//! Turning a [`Moment`] into text using a date format pattern
//!
//! Patterns use the PHP `date()` syntax (`Y-m-d`, `D, m/d/Y - H:i`, ...), the
//! syntax stored date formats are written in.  Any character that isn't a
//! format character is copied as is, and a backslash copies the character
//! after it as is (so `\T` gives a literal `T`).
//!

use crate::Moment;
use chrono::{DateTime, Datelike, NaiveDate, Offset, TimeDelta, Timelike};
use chrono_tz::{OffsetComponents, Tz};
use std::fmt::{self, Write};

/// Something that can render a [`Moment`] with a pattern
///
/// The moment is rendered in its own timezone, so any timezone conversion
/// happens before this is called.
pub trait DateFormatter {
    fn format(&self, moment: &Moment, pattern: &str) -> String;
}

/// A [`DateFormatter`] understanding PHP `date()` patterns, with English
/// month and day names
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpDateFormatter;

impl DateFormatter for PhpDateFormatter {
    fn format(&self, moment: &Moment, pattern: &str) -> String {
        PhpDate { moment, pattern }.to_string()
    }
}

/// A moment paired with the pattern to display it with
struct PhpDate<'a> {
    moment: &'a Moment,
    pattern: &'a str,
}

impl fmt::Display for PhpDate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let datetime = self.moment.datetime();
        let mut chars = self.pattern.chars();

        while let Some(character) = chars.next() {
            match character {
                // Day
                'd' => write!(f, "{:02}", datetime.day())?,
                'D' => write!(f, "{}", datetime.format("%a"))?,
                'j' => write!(f, "{}", datetime.day())?,
                'l' => write!(f, "{}", datetime.format("%A"))?,
                'N' => write!(f, "{}", datetime.weekday().number_from_monday())?,
                'S' => f.write_str(english_ordinal_suffix(datetime.day()))?,
                'w' => write!(f, "{}", datetime.weekday().num_days_from_sunday())?,
                'z' => write!(f, "{}", datetime.ordinal0())?,

                // Week
                'W' => write!(f, "{:02}", datetime.iso_week().week())?,

                // Month
                'F' => write!(f, "{}", datetime.format("%B"))?,
                'm' => write!(f, "{:02}", datetime.month())?,
                'M' => write!(f, "{}", datetime.format("%b"))?,
                'n' => write!(f, "{}", datetime.month())?,
                't' => write!(f, "{}", days_in_month(datetime.year(), datetime.month()))?,

                // Year
                'L' => write!(f, "{}", u8::from(is_leap_year(datetime.year())))?,
                'o' => write_year(f, datetime.iso_week().year())?,
                'Y' => write_year(f, datetime.year())?,
                'y' => write!(f, "{:02}", datetime.year().rem_euclid(100))?,

                // Time
                'a' => f.write_str(if datetime.hour12().0 { "pm" } else { "am" })?,
                'A' => f.write_str(if datetime.hour12().0 { "PM" } else { "AM" })?,
                'g' => write!(f, "{}", datetime.hour12().1)?,
                'G' => write!(f, "{}", datetime.hour())?,
                'h' => write!(f, "{:02}", datetime.hour12().1)?,
                'H' => write!(f, "{:02}", datetime.hour())?,
                'i' => write!(f, "{:02}", datetime.minute())?,
                's' => write!(f, "{:02}", datetime.second())?,
                'u' => write!(f, "{:06}", datetime.timestamp_subsec_micros())?,
                'v' => write!(f, "{:03}", datetime.timestamp_subsec_millis())?,

                // Timezone
                'e' => f.write_str(self.moment.timezone().name())?,
                'I' => {
                    let is_dst = datetime.offset().dst_offset() != TimeDelta::zero();
                    write!(f, "{}", u8::from(is_dst))?
                }
                'O' => write!(f, "{}", datetime.format("%z"))?,
                'P' => write!(f, "{}", datetime.format("%:z"))?,
                'p' => {
                    if datetime.offset().fix().local_minus_utc() == 0 {
                        f.write_str("Z")?
                    } else {
                        write!(f, "{}", datetime.format("%:z"))?
                    }
                }
                'T' => write!(f, "{}", datetime.format("%Z"))?,
                'Z' => write!(f, "{}", datetime.offset().fix().local_minus_utc())?,

                // Full date/time
                'c' => {
                    write_year(f, datetime.year())?;
                    write!(f, "{}", datetime.format("-%m-%dT%H:%M:%S%:z"))?
                }
                'r' => write_rfc2822(f, datetime)?,
                'U' => write!(f, "{}", datetime.timestamp())?,

                // Escaped & literal characters
                '\\' => f.write_char(chars.next().unwrap_or('\\'))?,
                other => f.write_char(other)?,
            }
        }

        Ok(())
    }
}

/// At least 4 digits, with the sign in front of any padding
fn write_year<W: Write>(output: &mut W, year: i32) -> fmt::Result {
    if year < 0 {
        write!(output, "-{:04}", year.unsigned_abs())
    } else {
        write!(output, "{year:04}")
    }
}

/// `Thu, 21 Dec 2000 16:01:07 +0200`, built by hand because chrono's
/// `to_rfc2822` only handles years 0 to 9999
fn write_rfc2822<W: Write>(output: &mut W, datetime: &DateTime<Tz>) -> fmt::Result {
    write!(output, "{}", datetime.format("%a, %d %b "))?;
    write_year(output, datetime.year())?;
    write!(output, "{}", datetime.format(" %H:%M:%S %z"))
}

/// st, nd, rd or th
fn english_ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last_of_this| last_of_this.day())
        .unwrap_or(31)
}
