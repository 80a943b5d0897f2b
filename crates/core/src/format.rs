// SPDX-License-Identifier: MIT

//!
//! Date format identifiers, definitions, and where they are loaded from
//!

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

/// The settings value meaning "use the default format"
pub const FALLBACK: &str = "fallback";

/// Errors that can arise in relation to a [`FormatId`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatIdError {
    #[error("Format ID cannot be empty")]
    Empty,

    #[error("`fallback` is reserved and cannot be used as a format ID")]
    Reserved,
}

/// The identifier of a stored date format (e.g. `medium`, `html_date`)
///
/// Never empty, and never the [`FALLBACK`] sentinel, which is modelled by
/// [`FormatChoice::UseDefault`] instead.
#[derive(derive_more::Display, Serialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct FormatId(String);

impl FormatId {
    /// Create a new format ID if it will be valid
    pub fn from<S: ToString>(id: S) -> Result<Self, FormatIdError> {
        let id = id.to_string();
        let id = id.trim();
        if id.is_empty() {
            Err(FormatIdError::Empty)
        } else if id == FALLBACK {
            Err(FormatIdError::Reserved)
        } else {
            Ok(FormatId(id.to_string()))
        }
    }

    /// The site's medium date format, the out of the box default format
    pub fn medium() -> Self {
        FormatId(String::from("medium"))
    }

    /// Get the underlying `&str`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for FormatId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        FormatId::from(string).map_err(serde::de::Error::custom)
    }
}

/// A configured format: either a specific stored format or "whatever the
/// default format is"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum FormatChoice {
    Explicit(FormatId),
    #[default]
    UseDefault,
}

impl FormatChoice {
    /// The string stored in settings for this choice
    pub fn as_str(&self) -> &str {
        match self {
            FormatChoice::Explicit(id) => id.as_str(),
            FormatChoice::UseDefault => FALLBACK,
        }
    }
}

impl std::fmt::Display for FormatChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FormatChoice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FormatChoice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        if string.trim() == FALLBACK {
            return Ok(FormatChoice::UseDefault);
        }
        FormatId::from(string)
            .map(FormatChoice::Explicit)
            .map_err(serde::de::Error::custom)
    }
}

/// A stored date format: a human label and a PHP `date()` style pattern
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FormatDefinition {
    id: FormatId,
    label: String,
    pattern: String,
}

impl FormatDefinition {
    pub fn new<L: ToString, P: ToString>(id: FormatId, label: L, pattern: P) -> Self {
        Self {
            id,
            label: label.to_string(),
            pattern: pattern.to_string(),
        }
    }

    pub fn id(&self) -> &FormatId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Somewhere date formats are kept
///
/// Lookups happen when settings are resolved, not on every render, so a
/// store backed by something slow should still be fine.
pub trait FormatStore {
    /// Load a single format, `None` if there's no such format
    fn load(&self, id: &FormatId) -> Option<FormatDefinition>;

    /// Load every format (used for listing the choices in a settings UI)
    fn load_all(&self) -> BTreeMap<FormatId, FormatDefinition>;
}

/// A [`FormatStore`] held in memory
///
/// (De)serialises as a list of [`FormatDefinition`]s.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(from = "Vec<FormatDefinition>", into = "Vec<FormatDefinition>")]
pub struct InMemoryFormatStore {
    formats: BTreeMap<FormatId, FormatDefinition>,
}

impl InMemoryFormatStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the usual site-wide formats
    pub fn with_site_formats() -> Self {
        #[rustfmt::skip]
        let site_formats = [
            ("html_date", "HTML Date", "Y-m-d"),
            ("html_datetime", "HTML Datetime", "Y-m-d\\TH:i:sO"),
            ("html_month", "HTML Month", "Y-m"),
            ("html_time", "HTML Time", "H:i:s"),
            ("html_week", "HTML Week", "Y-\\WW"),
            ("html_year", "HTML Year", "Y"),
            ("html_yearless_date", "HTML Yearless date", "m-d"),
            ("long", "Default long date", "l, F j, Y - H:i"),
            ("medium", "Default medium date", "D, m/d/Y - H:i"),
            ("short", "Default short date", "m/d/Y - H:i"),
        ];

        site_formats
            .into_iter()
            .filter_map(|(id, label, pattern)| {
                FormatId::from(id)
                    .ok()
                    .map(|id| FormatDefinition::new(id, label, pattern))
            })
            .collect()
    }

    /// Read a store from a JSON list of format definitions
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add (or replace) a format
    pub fn insert(&mut self, definition: FormatDefinition) {
        self.formats.insert(definition.id().clone(), definition);
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl FromIterator<FormatDefinition> for InMemoryFormatStore {
    fn from_iter<I: IntoIterator<Item = FormatDefinition>>(iter: I) -> Self {
        let mut store = InMemoryFormatStore::new();
        for definition in iter {
            store.insert(definition);
        }
        store
    }
}

impl From<Vec<FormatDefinition>> for InMemoryFormatStore {
    fn from(definitions: Vec<FormatDefinition>) -> Self {
        definitions.into_iter().collect()
    }
}

impl From<InMemoryFormatStore> for Vec<FormatDefinition> {
    fn from(store: InMemoryFormatStore) -> Self {
        store.formats.into_values().collect()
    }
}

impl FormatStore for InMemoryFormatStore {
    fn load(&self, id: &FormatId) -> Option<FormatDefinition> {
        self.formats.get(id).cloned()
    }

    fn load_all(&self) -> BTreeMap<FormatId, FormatDefinition> {
        self.formats.clone()
    }
}
