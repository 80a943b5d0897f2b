// SPDX-License-Identifier: MIT

//!
//! Choosing the start and end formats for a date range
//!

use crate::{FormatDefinition, Moment, ResolvedSettings, TimeOfDay};
use log::{debug, trace};

/// The coarsest unit at which the start and end of a range differ
#[derive(derive_more::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    #[display("different year")]
    Year,
    #[display("different month")]
    Month,
    #[display("different day")]
    Day,
    #[display("different time")]
    Time,
    #[display("identical")]
    Identical,
}

impl Granularity {
    /// Compare the wall clock parts of the two moments, year first
    pub fn between(start: &Moment, end: &Moment) -> Self {
        if start.year() != end.year() {
            Granularity::Year
        } else if start.month() != end.month() {
            Granularity::Month
        } else if start.day() != end.day() {
            Granularity::Day
        } else if start.time_of_day() != end.time_of_day() {
            Granularity::Time
        } else {
            Granularity::Identical
        }
    }
}

/// The formats chosen for each side of a range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedFormats<'a> {
    pub granularity: Granularity,
    pub start: &'a FormatDefinition,
    pub end: &'a FormatDefinition,
}

/// Choose the formats for the start and end of a range
///
/// | Granularity | Start | End |
/// |---|---|---|
/// | [`Granularity::Year`] | default | default |
/// | [`Granularity::Month`] | `different_month` start | `different_month` end |
/// | [`Granularity::Day`] | `different_date` start | `different_date` end |
/// | [`Granularity::Time`] | `different_time` start* | `different_time` end* |
/// | [`Granularity::Identical`] | default | default |
///
/// \* A start at exactly 00:00:00 or an end at exactly 23:59:59 is taken to
/// mean no time was entered for that side, and the default format is used for
/// it instead.  This is a guess: a range genuinely starting at midnight, or
/// ending at 23:59:59, can't be told apart from one without a time.
pub fn select_formats<'a>(
    start: &Moment,
    end: &Moment,
    settings: &'a ResolvedSettings,
) -> SelectedFormats<'a> {
    let granularity = Granularity::between(start, end);
    let default = settings.default_format();

    let (start_format, end_format) = match granularity {
        Granularity::Year | Granularity::Identical => (default, default),
        Granularity::Month => {
            let pair = settings.different_month();
            (&pair.start, &pair.end)
        }
        Granularity::Day => {
            let pair = settings.different_date();
            (&pair.start, &pair.end)
        }
        Granularity::Time => {
            let pair = settings.different_time();

            let start_format = if start.time_of_day() == TimeOfDay::START_OF_DAY {
                trace!("Start time is the start of the day, using the default format");
                default
            } else {
                &pair.start
            };

            let end_format = if end.time_of_day() == TimeOfDay::END_OF_DAY {
                trace!("End time is the end of the day, using the default format");
                default
            } else {
                &pair.end
            };

            (start_format, end_format)
        }
    };

    debug!(
        "Range is {granularity}: start format `{}`, end format `{}`",
        start_format.id(),
        end_format.id()
    );

    SelectedFormats {
        granularity,
        start: start_format,
        end: end_format,
    }
}
