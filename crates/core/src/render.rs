// SPDX-License-Identifier: MIT

//!
//! Rendering date ranges as text fragments
//!

use crate::{
    DateFormatter, Moment, MomentError, ResolvedSettings, SelectedFormats, select_formats,
};
use log::{debug, warn};
use serde::Serialize;
use std::fmt;

/// One piece of a rendered range
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum DisplayFragment {
    StartDate(String),
    Separator(String),
    EndDate(String),
}

impl DisplayFragment {
    /// Borrow the fragment's text
    pub fn text(&self) -> &str {
        match self {
            DisplayFragment::StartDate(text)
            | DisplayFragment::Separator(text)
            | DisplayFragment::EndDate(text) => text,
        }
    }
}

/// A rendered range: either just the start, or start, separator and end
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RenderedRange {
    fragments: Vec<DisplayFragment>,
}

impl RenderedRange {
    fn single(start: String) -> Self {
        Self {
            fragments: vec![DisplayFragment::StartDate(start)],
        }
    }

    fn full(start: String, separator: String, end: String) -> Self {
        Self {
            fragments: vec![
                DisplayFragment::StartDate(start),
                DisplayFragment::Separator(separator),
                DisplayFragment::EndDate(end),
            ],
        }
    }

    /// Borrow the fragments, in display order
    pub fn fragments(&self) -> &[DisplayFragment] {
        &self.fragments
    }

    /// The text of each fragment, in display order
    pub fn texts(&self) -> Vec<&str> {
        self.fragments.iter().map(DisplayFragment::text).collect()
    }

    /// Whether only the start is shown
    pub fn is_single(&self) -> bool {
        self.fragments.len() == 1
    }

    pub fn into_fragments(self) -> Vec<DisplayFragment> {
        self.fragments
    }
}

impl fmt::Display for RenderedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.fragments {
            f.write_str(fragment.text())?;
        }
        Ok(())
    }
}

/// One value of a date range field.  Either end may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateRangeItem {
    pub start: Option<Moment>,
    pub end: Option<Moment>,
}

impl DateRangeItem {
    pub fn new(start: Option<Moment>, end: Option<Moment>) -> Self {
        Self { start, end }
    }
}

/// Render a range using formats already chosen by [`select_formats`]
///
/// When start and end are the same instant the start alone is rendered with
/// the default format.  Otherwise both are rendered, and if they come out as
/// the same text (the formats being coarser than the difference) only the
/// start is kept.
pub fn render_range<F: DateFormatter + ?Sized>(
    start: &Moment,
    end: &Moment,
    formats: &SelectedFormats<'_>,
    settings: &ResolvedSettings,
    formatter: &F,
) -> RenderedRange {
    if start.same_instant(end) {
        let pattern = settings.default_format().pattern();
        return RenderedRange::single(formatter.format(start, pattern));
    }

    let start_text = formatter.format(start, formats.start.pattern());
    let end_text = formatter.format(end, formats.end.pattern());

    if start_text == end_text {
        debug!("Start and end both render as `{start_text}`, showing the start only");
        return RenderedRange::single(start_text);
    }

    RenderedRange::full(start_text, settings.separator().to_string(), end_text)
}

/// Renders date ranges with a set of resolved settings
pub struct RangeRenderer<'a, F: DateFormatter + ?Sized> {
    settings: &'a ResolvedSettings,
    formatter: &'a F,
}

impl<'a, F: DateFormatter + ?Sized> RangeRenderer<'a, F> {
    pub fn new(settings: &'a ResolvedSettings, formatter: &'a F) -> Self {
        Self {
            settings,
            formatter,
        }
    }

    /// Render one range.  A missing end is treated as being the start.
    ///
    /// Errors only if the timezone override moves a moment out of the
    /// supported years.
    pub fn render(
        &self,
        start: &Moment,
        end: Option<&Moment>,
    ) -> Result<RenderedRange, MomentError> {
        let end = end.unwrap_or(start);
        let (start, end) = match self.settings.timezone_override() {
            Some(timezone) => (start.with_timezone(timezone)?, end.with_timezone(timezone)?),
            None => (*start, *end),
        };

        let formats = select_formats(&start, &end, self.settings);
        Ok(render_range(
            &start,
            &end,
            &formats,
            self.settings,
            self.formatter,
        ))
    }

    /// Render each value of a field, paired with its position.  Values
    /// without a start are skipped.
    pub fn render_items(
        &self,
        items: &[DateRangeItem],
    ) -> Result<Vec<(usize, RenderedRange)>, MomentError> {
        let mut rendered = Vec::with_capacity(items.len());
        for (delta, item) in items.iter().enumerate() {
            let Some(start) = &item.start else {
                warn!("Skipping date range {delta}, it has no start date");
                continue;
            };
            rendered.push((delta, self.render(start, item.end.as_ref())?));
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        FormatChoice, FormatDefinition, FormatId, FormatPair, InMemoryFormatStore,
        PhpDateFormatter, RangeSettings, TimeOfDay,
    };
    use chrono_tz::{America, Europe, UTC};
    use daterange_macros::time_of_day;

    fn id(id: &str) -> FormatId {
        FormatId::from(id).unwrap()
    }

    fn explicit(id_str: &str) -> FormatChoice {
        FormatChoice::Explicit(id(id_str))
    }

    fn moment(year: i64, month: i64, day: i64, time: TimeOfDay) -> Moment {
        Moment::from(UTC, year, month, day, time).unwrap()
    }

    fn store() -> InMemoryFormatStore {
        [
            ("ymd", "Y-m-d"),
            ("day", "d"),
            ("day_month", "d M"),
            ("month_year", "M Y"),
            ("time", "H:i"),
        ]
        .into_iter()
        .map(|(format_id, pattern)| FormatDefinition::new(id(format_id), format_id, pattern))
        .collect()
    }

    fn settings() -> RangeSettings {
        let mut settings = RangeSettings::default();
        settings.set_default_format(id("ymd"));
        settings.set_separator(" - ");
        settings.set_different_date(FormatPair::new(explicit("day"), explicit("day_month")));
        settings
    }

    fn render(
        settings: &RangeSettings,
        start: &Moment,
        end: Option<&Moment>,
    ) -> RenderedRange {
        let resolved = settings.resolve(&store()).unwrap();
        RangeRenderer::new(&resolved, &PhpDateFormatter)
            .render(start, end)
            .unwrap()
    }

    #[test]
    fn same_instant_renders_once() {
        let start = moment(2024, 3, 1, TimeOfDay::START_OF_DAY);
        let end = moment(2024, 3, 1, TimeOfDay::START_OF_DAY);
        let rendered = render(&settings(), &start, Some(&end));
        assert_eq!(rendered.texts(), vec!["2024-03-01"]);
        assert!(rendered.is_single());
    }

    #[test]
    fn same_instant_in_different_timezones_renders_once() {
        // Wall-clock parts all differ, the instant doesn't
        let start = moment(2024, 1, 31, time_of_day!(230000));
        let end = start.with_timezone(Europe::Paris).unwrap();
        assert_eq!(end.month().value(), 2);
        let rendered = render(&settings(), &start, Some(&end));
        assert_eq!(rendered.texts(), vec!["2024-01-31"]);
        assert!(rendered.is_single());
    }

    #[test]
    fn negative_years() {
        let start = moment(-44, 3, 15, TimeOfDay::START_OF_DAY);
        let end = moment(-44, 3, 16, TimeOfDay::START_OF_DAY);
        let rendered = render(&settings(), &start, Some(&end));
        assert_eq!(rendered.to_string(), "15 - 16 Mar");

        let rendered = render(&settings(), &start, None);
        assert_eq!(rendered.texts(), vec!["-0044-03-15"]);
    }

    #[test]
    fn different_day() {
        let start = moment(2024, 3, 1, TimeOfDay::START_OF_DAY);
        let end = moment(2024, 3, 2, TimeOfDay::START_OF_DAY);
        let rendered = render(&settings(), &start, Some(&end));
        assert_eq!(rendered.texts(), vec!["01", " - ", "02 Mar"]);
        assert_eq!(
            rendered.fragments(),
            &[
                DisplayFragment::StartDate("01".into()),
                DisplayFragment::Separator(" - ".into()),
                DisplayFragment::EndDate("02 Mar".into()),
            ]
        );
        assert_eq!(rendered.to_string(), "01 - 02 Mar");
    }

    #[test]
    fn different_month_uses_month_formats() {
        let mut settings = settings();
        settings.set_different_month(FormatPair::new(explicit("day_month"), explicit("day_month")));
        let start = moment(2024, 1, 15, time_of_day!(90000));
        let end = moment(2024, 2, 20, time_of_day!(90000));
        let rendered = render(&settings, &start, Some(&end));
        assert_eq!(rendered.texts(), vec!["15 Jan", " - ", "20 Feb"]);
    }

    #[test]
    fn missing_end_renders_start_only() {
        let start = moment(2024, 5, 5, time_of_day!(100000));
        let rendered = render(&settings(), &start, None);
        assert_eq!(rendered.texts(), vec!["2024-05-05"]);
    }

    #[test]
    fn identical_text_collapses() {
        // Times differ, but neither format shows the time
        let mut settings = settings();
        settings.set_different_time(FormatPair::new(explicit("ymd"), explicit("ymd")));
        let start = moment(2024, 3, 1, time_of_day!(90000));
        let end = moment(2024, 3, 1, time_of_day!(170000));
        let rendered = render(&settings, &start, Some(&end));
        assert_eq!(rendered.texts(), vec!["2024-03-01"]);

        // Days differ, but both sides only show the month
        let mut settings = settings.clone();
        settings.set_different_date(FormatPair::new(
            explicit("month_year"),
            explicit("month_year"),
        ));
        let start = moment(2024, 3, 1, TimeOfDay::START_OF_DAY);
        let end = moment(2024, 3, 9, TimeOfDay::START_OF_DAY);
        let rendered = render(&settings, &start, Some(&end));
        assert_eq!(rendered.texts(), vec!["Mar 2024"]);
    }

    #[test]
    fn different_time_keeps_separator() {
        let mut settings = settings();
        settings.set_different_time(FormatPair::new(explicit("time"), explicit("time")));
        let start = moment(2024, 3, 1, time_of_day!(90000));
        let end = moment(2024, 3, 1, time_of_day!(170000));
        let rendered = render(&settings, &start, Some(&end));
        assert_eq!(rendered.to_string(), "09:00 - 17:00");

        // A midnight start is treated as having no time
        let start = moment(2024, 3, 1, TimeOfDay::START_OF_DAY);
        let rendered = render(&settings, &start, Some(&end));
        assert_eq!(rendered.to_string(), "2024-03-01 - 17:00");
    }

    #[test]
    fn render_is_repeatable() {
        let start = moment(2024, 3, 1, time_of_day!(90000));
        let end = moment(2024, 3, 4, time_of_day!(90000));
        let first = render(&settings(), &start, Some(&end));
        let second = render(&settings(), &start, Some(&end));
        assert_eq!(first, second);
    }

    #[test]
    fn timezone_override_applies_before_comparing() {
        // 1 Mar 03:00 UTC and 2 Mar 03:00 UTC are 29 Feb and 1 Mar in New York
        let mut settings = settings();
        settings.set_different_month(FormatPair::new(explicit("day_month"), explicit("day_month")));
        settings.set_timezone_override(Some(America::New_York));
        let start = moment(2024, 3, 1, time_of_day!(30000));
        let end = moment(2024, 3, 2, time_of_day!(30000));
        let rendered = render(&settings, &start, Some(&end));
        assert_eq!(rendered.texts(), vec!["29 Feb", " - ", "01 Mar"]);
    }

    #[test]
    fn render_items_skips_missing_starts() {
        let resolved = settings().resolve(&store()).unwrap();
        let renderer = RangeRenderer::new(&resolved, &PhpDateFormatter);
        let items = [
            DateRangeItem::new(
                Some(moment(2024, 3, 1, TimeOfDay::START_OF_DAY)),
                Some(moment(2024, 3, 2, TimeOfDay::START_OF_DAY)),
            ),
            DateRangeItem::new(None, Some(moment(2024, 3, 2, TimeOfDay::START_OF_DAY))),
            DateRangeItem::new(Some(moment(2024, 5, 5, time_of_day!(100000))), None),
        ];

        let rendered = renderer.render_items(&items).unwrap();
        let summary: Vec<(usize, String)> = rendered
            .iter()
            .map(|(delta, range)| (*delta, range.to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![(0, "01 - 02 Mar".to_string()), (2, "2024-05-05".to_string())]
        );
    }

    #[test]
    fn serialised_fragments() {
        let start = moment(2024, 3, 1, TimeOfDay::START_OF_DAY);
        let end = moment(2024, 3, 2, TimeOfDay::START_OF_DAY);
        let rendered = render(&settings(), &start, Some(&end));
        let json = serde_json::to_string(&rendered).unwrap();
        assert_eq!(
            json,
            r#"[{"kind":"start_date","text":"01"},{"kind":"separator","text":" - "},{"kind":"end_date","text":"02 Mar"}]"#
        );
    }
}
