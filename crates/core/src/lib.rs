// SPDX-License-Identifier: MIT

//!
//! *Part of the wider daterange project*
//!
//! This crate renders date ranges (a start and an end moment) as text,
//! choosing between configured date formats depending on how much the start
//! and end differ: a different year, month, day or just time of day.  Where
//! the start and end would render identically, only the start is shown.
//!
//! Settings are resolved against a [`FormatStore`] once, giving
//! [`ResolvedSettings`] which are then used for any number of renders.
//!
//! ```
//! use chrono_tz::UTC;
//! use daterange_core::*;
//!
//! let store = InMemoryFormatStore::with_site_formats();
//! let mut settings = RangeSettings::default();
//! settings.set_default_format(FormatId::from("html_date").unwrap());
//! settings.set_separator(" to ");
//! let settings = settings.resolve(&store).unwrap();
//!
//! let start = Moment::parse("2024-03-01", UTC).unwrap();
//! let end = Moment::parse("2024-04-01", UTC).unwrap();
//! let rendered = RangeRenderer::new(&settings, &PhpDateFormatter)
//!     .render(&start, Some(&end))
//!     .unwrap();
//! assert_eq!(rendered.to_string(), "2024-03-01 to 2024-04-01");
//! ```
//!

mod format;
mod moment;
mod php_date;
mod render;
mod selector;
mod settings;
mod summary;

pub use format::*;
pub use moment::*;
pub use php_date::*;
pub use render::*;
pub use selector::*;
pub use settings::*;
pub use summary::*;
