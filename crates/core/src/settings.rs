// SPDX-License-Identifier: MIT

//!
//! Date range formatter settings, as persisted and as resolved for rendering
//!

use crate::{FormatChoice, FormatDefinition, FormatId, FormatStore};
use chrono_tz::Tz;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// The separator used when none is configured
pub const DEFAULT_SEPARATOR: &str = "-";

/// Errors that can arise in relation to the [`RangeSettings`]
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// A setting names a format that the store doesn't have
    #[error("Unknown date format `{id}` in setting `{slot}`")]
    UnknownFormat { slot: SettingSlot, id: FormatId },

    /// The persisted settings couldn't be read
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Names each format setting, for error messages
#[derive(derive_more::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingSlot {
    #[display("default_format")]
    Default,
    #[display("different_time.start_format")]
    DifferentTimeStart,
    #[display("different_time.end_format")]
    DifferentTimeEnd,
    #[display("different_date.start_format")]
    DifferentDateStart,
    #[display("different_date.end_format")]
    DifferentDateEnd,
    #[display("different_month.start_format")]
    DifferentMonthStart,
    #[display("different_month.end_format")]
    DifferentMonthEnd,
}

/// The formats to use for the start and end of a range in one situation
/// (e.g. "same month, different day")
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct FormatPair {
    #[serde(alias = "date_format_start", default)]
    pub start_format: FormatChoice,

    #[serde(alias = "date_format_end", default)]
    pub end_format: FormatChoice,
}

impl FormatPair {
    pub fn new(start_format: FormatChoice, end_format: FormatChoice) -> Self {
        Self {
            start_format,
            end_format,
        }
    }

    /// Whether both sides just use the default format
    pub fn uses_default(&self) -> bool {
        self.start_format == FormatChoice::UseDefault && self.end_format == FormatChoice::UseDefault
    }
}

/// The date range formatter settings, as persisted
///
/// The older setting names (`date_format`, `date_format_start`,
/// `date_format_end`) are accepted when deserialising.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct RangeSettings {
    /// Used when the years differ, when start and end are the same instant,
    /// and wherever a [`FormatChoice::UseDefault`] is configured
    #[serde(alias = "date_format")]
    default_format: FormatId,

    /// Used when only the time of day differs
    different_time: FormatPair,

    /// Used when the month is the same but the day differs
    different_date: FormatPair,

    /// Used when the year is the same but the month differs
    different_month: FormatPair,

    /// Placed between the start and end when both are shown
    separator: String,

    /// When set, both dates are shown in this timezone rather than their own
    #[serde(deserialize_with = "deserialize_timezone_override")]
    timezone_override: Option<Tz>,
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            default_format: FormatId::medium(),
            different_time: FormatPair::default(),
            different_date: FormatPair::default(),
            different_month: FormatPair::default(),
            separator: String::from(DEFAULT_SEPARATOR),
            timezone_override: None,
        }
    }
}

/// An empty string is stored when there's no override
fn deserialize_timezone_override<'de, D>(deserializer: D) -> Result<Option<Tz>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(name) if name.trim().is_empty() => Ok(None),
        Some(name) => name
            .trim()
            .parse::<Tz>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl RangeSettings {
    /// Read persisted settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the settings as (pretty) JSON
    pub fn to_json(&self) -> Result<String, ConfigurationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn default_format(&self) -> &FormatId {
        &self.default_format
    }

    pub fn set_default_format(&mut self, default_format: FormatId) {
        self.default_format = default_format;
    }

    pub fn different_time(&self) -> &FormatPair {
        &self.different_time
    }

    pub fn set_different_time(&mut self, pair: FormatPair) {
        self.different_time = pair;
    }

    pub fn different_date(&self) -> &FormatPair {
        &self.different_date
    }

    pub fn set_different_date(&mut self, pair: FormatPair) {
        self.different_date = pair;
    }

    pub fn different_month(&self) -> &FormatPair {
        &self.different_month
    }

    pub fn set_different_month(&mut self, pair: FormatPair) {
        self.different_month = pair;
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn set_separator<S: ToString>(&mut self, separator: S) {
        self.separator = separator.to_string();
    }

    pub fn timezone_override(&self) -> Option<Tz> {
        self.timezone_override
    }

    pub fn set_timezone_override(&mut self, timezone: Option<Tz>) {
        self.timezone_override = timezone;
    }

    /// Check every format setting can be resolved.  Intended to be called
    /// when the settings are saved, so that rendering never meets a bad
    /// format.
    pub fn validate<S: FormatStore + ?Sized>(&self, store: &S) -> Result<(), ConfigurationError> {
        self.resolve(store).map(|_| ())
    }

    /// Look up every format setting in the store, replacing each
    /// [`FormatChoice::UseDefault`] with the default format
    pub fn resolve<S: FormatStore + ?Sized>(
        &self,
        store: &S,
    ) -> Result<ResolvedSettings, ConfigurationError> {
        let load = |slot: SettingSlot, id: &FormatId| {
            store
                .load(id)
                .ok_or_else(|| ConfigurationError::UnknownFormat {
                    slot,
                    id: id.clone(),
                })
        };

        let default = load(SettingSlot::Default, &self.default_format)?;

        let choose = |slot: SettingSlot, choice: &FormatChoice| match choice {
            FormatChoice::UseDefault => Ok(default.clone()),
            FormatChoice::Explicit(id) => load(slot, id),
        };

        let different_time = ResolvedPair {
            start: choose(SettingSlot::DifferentTimeStart, &self.different_time.start_format)?,
            end: choose(SettingSlot::DifferentTimeEnd, &self.different_time.end_format)?,
        };
        let different_date = ResolvedPair {
            start: choose(SettingSlot::DifferentDateStart, &self.different_date.start_format)?,
            end: choose(SettingSlot::DifferentDateEnd, &self.different_date.end_format)?,
        };
        let different_month = ResolvedPair {
            start: choose(
                SettingSlot::DifferentMonthStart,
                &self.different_month.start_format,
            )?,
            end: choose(SettingSlot::DifferentMonthEnd, &self.different_month.end_format)?,
        };

        debug!(
            "Resolved date range settings with default format `{}`",
            default.id()
        );

        Ok(ResolvedSettings {
            default,
            different_time,
            different_date,
            different_month,
            separator: self.separator.clone(),
            timezone_override: self.timezone_override,
        })
    }
}

/// A [`FormatPair`] after lookup
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedPair {
    pub start: FormatDefinition,
    pub end: FormatDefinition,
}

/// [`RangeSettings`] with every format looked up, ready for rendering
///
/// Only obtainable through [`RangeSettings::resolve`], so holding one means
/// every format exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSettings {
    default: FormatDefinition,
    different_time: ResolvedPair,
    different_date: ResolvedPair,
    different_month: ResolvedPair,
    separator: String,
    timezone_override: Option<Tz>,
}

impl ResolvedSettings {
    pub fn default_format(&self) -> &FormatDefinition {
        &self.default
    }

    pub fn different_time(&self) -> &ResolvedPair {
        &self.different_time
    }

    pub fn different_date(&self) -> &ResolvedPair {
        &self.different_date
    }

    pub fn different_month(&self) -> &ResolvedPair {
        &self.different_month
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn timezone_override(&self) -> Option<Tz> {
        self.timezone_override
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::InMemoryFormatStore;
    use std::{
        fs::{self, File},
        io::{self, BufRead},
        path::PathBuf,
    };

    fn id(id: &str) -> FormatId {
        FormatId::from(id).unwrap()
    }

    #[test]
    fn defaults() {
        let settings = RangeSettings::default();
        assert_eq!(settings.default_format(), &id("medium"));
        assert!(settings.different_time().uses_default());
        assert!(settings.different_date().uses_default());
        assert!(settings.different_month().uses_default());
        assert_eq!(settings.separator(), "-");
        assert!(settings.timezone_override().is_none());

        // Missing keys take their defaults
        let settings = RangeSettings::from_json("{}").unwrap();
        assert_eq!(settings, RangeSettings::default());
    }

    #[test]
    fn older_key_names() {
        let json = r#"{
            "date_format": "long",
            "different_date": {"date_format_start": "html_date", "date_format_end": "fallback"},
            "separator": " to ",
            "timezone_override": ""
        }"#;
        let settings = RangeSettings::from_json(json).unwrap();
        assert_eq!(settings.default_format(), &id("long"));
        assert_eq!(
            settings.different_date(),
            &FormatPair::new(
                FormatChoice::Explicit(id("html_date")),
                FormatChoice::UseDefault
            )
        );
        assert_eq!(settings.separator(), " to ");
        assert!(settings.timezone_override().is_none());
    }

    #[test]
    fn resolve_replaces_fallback_with_default() {
        let store = InMemoryFormatStore::with_site_formats();
        let mut settings = RangeSettings::default();
        settings.set_default_format(id("html_date"));
        settings.set_different_month(FormatPair::new(
            FormatChoice::Explicit(id("html_yearless_date")),
            FormatChoice::UseDefault,
        ));

        let resolved = settings.resolve(&store).unwrap();
        assert_eq!(resolved.default_format().pattern(), "Y-m-d");
        assert_eq!(resolved.different_month().start.pattern(), "m-d");
        assert_eq!(resolved.different_month().end.pattern(), "Y-m-d");
        assert_eq!(resolved.different_time().start.pattern(), "Y-m-d");
        assert_eq!(resolved.different_time().end.pattern(), "Y-m-d");
    }

    #[test]
    fn resolve_unknown_format() {
        let store = InMemoryFormatStore::with_site_formats();

        // Unknown default
        let mut settings = RangeSettings::default();
        settings.set_default_format(id("missing"));
        assert!(matches!(
            settings.validate(&store),
            Err(ConfigurationError::UnknownFormat {
                slot: SettingSlot::Default,
                ..
            })
        ));

        // Unknown override
        let mut settings = RangeSettings::default();
        settings.set_different_time(FormatPair::new(
            FormatChoice::UseDefault,
            FormatChoice::Explicit(id("missing")),
        ));
        let error = settings.resolve(&store).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Unknown date format `missing` in setting `different_time.end_format`"
        );
    }

    #[test]
    fn json_round_trip_uses_sentinel() {
        let mut settings = RangeSettings::default();
        settings.set_timezone_override(Some(chrono_tz::Europe::Paris));
        let json = settings.to_json().unwrap();
        assert!(json.contains(r#""start_format": "fallback""#));
        assert!(json.contains(r#""timezone_override": "Europe/Paris""#));
        assert_eq!(RangeSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn deserialisation() {
        let path_to_test_data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data");

        // Check the valid JSON settings can be parsed
        for entry in fs::read_dir(path_to_test_data.join("settings/valid")).unwrap() {
            let path = entry.unwrap().path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "jsonc") {
                println!("Reading file: {:?}", path);
                let json_content = load_jsonc_strip_leading_comment_lines(&path);
                assert!(RangeSettings::from_json(&json_content).is_ok())
            }
        }

        // Check the invalid JSON settings cannot be parsed
        for entry in fs::read_dir(path_to_test_data.join("settings/invalid")).unwrap() {
            let path = entry.unwrap().path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "jsonc") {
                println!("Reading file: {:?}", path);
                let json_content = load_jsonc_strip_leading_comment_lines(&path);
                assert!(RangeSettings::from_json(&json_content).is_err())
            }
        }
    }

    pub fn load_jsonc_strip_leading_comment_lines(path: &PathBuf) -> String {
        // Open the file for reading
        let file = File::open(path).unwrap();
        let reader = io::BufReader::new(file);

        // Collect all lines that don't begin with "//"
        let mut json_content = String::new();
        for line in reader.lines() {
            let line = line.unwrap();
            if !line.starts_with("//") {
                json_content.push_str(&line);
                json_content.push('\n');
            }
        }
        json_content
    }
}
