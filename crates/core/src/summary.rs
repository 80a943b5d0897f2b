// SPDX-License-Identifier: MIT

//!
//! Human readable descriptions of the settings, for a settings UI
//!

use crate::{
    DateFormatter, FormatChoice, FormatStore, Moment, MomentError, ResolvedPair,
    ResolvedSettings,
};

/// Describe the settings, one line per point, using `sample` to show what
/// each format looks like
pub fn summarize<F: DateFormatter + ?Sized>(
    settings: &ResolvedSettings,
    formatter: &F,
    sample: &Moment,
) -> Result<Vec<String>, MomentError> {
    let sample = match settings.timezone_override() {
        Some(timezone) => sample.with_timezone(timezone)?,
        None => *sample,
    };
    let default = settings.default_format();

    let mut summary = vec![format!(
        "Format: {}",
        formatter.format(&sample, default.pattern())
    )];

    let buckets = [
        ("Different time", settings.different_time()),
        ("Different date", settings.different_date()),
        ("Different month", settings.different_month()),
    ];
    for (title, pair) in buckets {
        if !is_customised(pair, settings) {
            continue;
        }
        summary.push(format!(
            "{title}: {} / {}",
            formatter.format(&sample, pair.start.pattern()),
            formatter.format(&sample, pair.end.pattern())
        ));
    }

    if !settings.separator().is_empty() {
        summary.push(format!("Separator: {}", settings.separator()));
    }

    if let Some(timezone) = settings.timezone_override() {
        summary.push(format!("Time zone: {}", timezone.name()));
    }

    Ok(summary)
}

fn is_customised(pair: &ResolvedPair, settings: &ResolvedSettings) -> bool {
    let default = settings.default_format().id();
    pair.start.id() != default || pair.end.id() != default
}

/// Every format that can be chosen in the settings, each with a label
/// showing what `sample` looks like in it.  The "use the default format"
/// choice comes first, then the stored formats in ID order.
pub fn format_options<S, F>(
    store: &S,
    formatter: &F,
    sample: &Moment,
) -> Vec<(FormatChoice, String)>
where
    S: FormatStore + ?Sized,
    F: DateFormatter + ?Sized,
{
    let fallback = (
        FormatChoice::UseDefault,
        String::from("Fallback (use the default format)"),
    );

    std::iter::once(fallback)
        .chain(store.load_all().into_values().map(|definition| {
            let label = format!(
                "{} ({})",
                definition.label(),
                formatter.format(sample, definition.pattern())
            );
            (FormatChoice::Explicit(definition.id().clone()), label)
        }))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        FormatId, FormatPair, InMemoryFormatStore, PhpDateFormatter, RangeSettings, TimeOfDay,
    };
    use chrono_tz::{Asia, UTC};
    use daterange_macros::time_of_day;

    fn sample() -> Moment {
        Moment::from(UTC, 2024, 3, 1, time_of_day!(90500)).unwrap()
    }

    #[test]
    fn default_settings_summary() {
        let store = InMemoryFormatStore::with_site_formats();
        let settings = RangeSettings::default().resolve(&store).unwrap();
        let summary = summarize(&settings, &PhpDateFormatter, &sample()).unwrap();
        assert_eq!(
            summary,
            vec!["Format: Fri, 03/01/2024 - 09:05", "Separator: -"]
        );
    }

    #[test]
    fn customised_settings_summary() {
        let store = InMemoryFormatStore::with_site_formats();
        let mut settings = RangeSettings::default();
        settings.set_default_format(FormatId::from("html_date").unwrap());
        settings.set_different_time(FormatPair::new(
            FormatChoice::UseDefault,
            FormatChoice::Explicit(FormatId::from("html_time").unwrap()),
        ));
        settings.set_separator("");
        settings.set_timezone_override(Some(Asia::Tokyo));
        let settings = settings.resolve(&store).unwrap();

        let summary = summarize(&settings, &PhpDateFormatter, &sample()).unwrap();
        assert_eq!(
            summary,
            vec![
                "Format: 2024-03-01",
                "Different time: 2024-03-01 / 18:05:00",
                "Time zone: Asia/Tokyo",
            ]
        );
    }

    #[test]
    fn options() {
        let store = InMemoryFormatStore::with_site_formats();
        let options = format_options(&store, &PhpDateFormatter, &sample());
        assert_eq!(options.len(), 11);
        assert_eq!(options[0].0, FormatChoice::UseDefault);
        assert_eq!(
            options[1],
            (
                FormatChoice::Explicit(FormatId::from("html_date").unwrap()),
                String::from("HTML Date (2024-03-01)")
            )
        );
        assert!(options.contains(&(
            FormatChoice::Explicit(FormatId::from("short").unwrap()),
            String::from("Default short date (03/01/2024 - 09:05)")
        )));
    }
}
