// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! The daterange command line tool
//!

use chrono::Utc;
use chrono_tz::Tz;
use clap::{CommandFactory, Parser, ValueEnum, builder::PossibleValue};
use daterange_core::{
    FormatStore, InMemoryFormatStore, Moment, PhpDateFormatter, RangeRenderer, RangeSettings,
    format_options, summarize,
};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
};
use std::fs;
use std::path::PathBuf;

#[macro_use]
extern crate log;
extern crate simplelog;

/// daterange entry point
///
/// One of:
/// - Render a date range
/// - Summarise the settings
/// - List the format options
/// - Validate the settings
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    // Setup logging
    let config_log = ConfigBuilder::new()
        .add_filter_allow_str("daterange")
        .build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    CombinedLogger::init(vec![TermLogger::new(
        level,
        config_log,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )])?;

    let timezone = args
        .timezone
        .parse::<Tz>()
        .unwrap_or_else(|error| exit_with_error(&format!("Invalid timezone: {error}")));
    let store = load_store(args.formats.as_ref());
    let settings = load_settings(args.settings.as_ref());

    // Check the options
    match (&args.cli_command, &args.start) {
        //----------------------------------------------------------------------
        // Valid
        //----------------------------------------------------------------------
        (Command::Validate, _) => match settings.validate(&store) {
            Ok(()) => println!("Settings are valid"),
            Err(error) => exit_with_error(&format!("Invalid settings: {error}")),
        },
        (Command::Render, Some(start)) => {
            let start = parse_moment(start, timezone);
            let end = args.end.as_ref().map(|end| parse_moment(end, timezone));

            let resolved = settings
                .resolve(&store)
                .unwrap_or_else(|error| exit_with_error(&format!("Invalid settings: {error}")));
            let rendered = RangeRenderer::new(&resolved, &PhpDateFormatter)
                .render(&start, end.as_ref())
                .unwrap_or_else(|error| exit_with_error(&format!("Error rendering: {error}")));

            if args.json {
                println!("{}", serde_json::to_string_pretty(&rendered)?);
            } else {
                println!("{rendered}");
            }
        }
        (Command::Summary, start) => {
            let sample = sample_moment(start.as_deref(), timezone);
            let resolved = settings
                .resolve(&store)
                .unwrap_or_else(|error| exit_with_error(&format!("Invalid settings: {error}")));
            let summary = summarize(&resolved, &PhpDateFormatter, &sample)
                .unwrap_or_else(|error| exit_with_error(&format!("Error summarising: {error}")));
            for line in summary {
                println!("{line}");
            }
        }
        (Command::Options, start) => {
            let sample = sample_moment(start.as_deref(), timezone);
            for (choice, label) in format_options(&store, &PhpDateFormatter, &sample) {
                println!("{choice}\t{label}");
            }
        }
        //----------------------------------------------------------------------
        // Invalid
        //----------------------------------------------------------------------
        (Command::Render, None) => {
            eprintln!("CLI Error: `render` needs a --start date");
            Cli::command().print_long_help()?;
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Print the error and exit with a failure status
fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Load the formats from a JSON file, or use the built-in site formats
fn load_store(path: Option<&PathBuf>) -> InMemoryFormatStore {
    let Some(path) = path else {
        info!("Using the built-in site formats");
        return InMemoryFormatStore::with_site_formats();
    };

    info!("Loading formats from {}", path.display());
    let json = fs::read_to_string(path)
        .unwrap_or_else(|error| exit_with_error(&format!("Reading {}: {error}", path.display())));
    let store = InMemoryFormatStore::from_json(&json)
        .unwrap_or_else(|error| exit_with_error(&format!("Invalid formats: {error}")));
    info!("Loaded {} formats", store.load_all().len());
    store
}

/// Load the settings from a JSON file, or use the defaults
fn load_settings(path: Option<&PathBuf>) -> RangeSettings {
    let Some(path) = path else {
        info!("Using the default settings");
        return RangeSettings::default();
    };

    info!("Loading settings from {}", path.display());
    let json = fs::read_to_string(path)
        .unwrap_or_else(|error| exit_with_error(&format!("Reading {}: {error}", path.display())));
    let settings = RangeSettings::from_json(&json)
        .unwrap_or_else(|error| exit_with_error(&format!("Invalid settings: {error}")));
    debug!("Settings loaded = {settings:?}");
    settings
}

fn parse_moment(string: &str, timezone: Tz) -> Moment {
    Moment::parse(string, timezone)
        .unwrap_or_else(|error| exit_with_error(&format!("Invalid date: {error}")))
}

/// The given date, or now
fn sample_moment(string: Option<&str>, timezone: Tz) -> Moment {
    match string {
        Some(string) => parse_moment(string, timezone),
        None => Moment::new(Utc::now().with_timezone(&timezone))
            .unwrap_or_else(|error| exit_with_error(&format!("Invalid date: {error}"))),
    }
}

/// daterange CLI args using [clap]
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Render date ranges with aggregated date formats",
    after_help = "Dates are `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD HH:MM:SS`"
)]
pub struct Cli {
    // Command
    #[arg(value_enum)]
    pub cli_command: Command,

    /// Path to the settings JSON (defaults are used if not given)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Path to a JSON list of date formats (the site formats are used if not
    /// given)
    #[arg(long)]
    pub formats: Option<PathBuf>,

    /// The start date (also the sample date for `summary` and `options`)
    #[arg(long)]
    pub start: Option<String>,

    /// The end date
    #[arg(long)]
    pub end: Option<String>,

    /// The IANA timezone the dates are given in
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Print the rendered fragments as JSON
    #[arg(long)]
    pub json: bool,

    /// Log what's going on
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub enum Command {
    Render,
    Summary,
    Options,
    Validate,
}

impl ValueEnum for Command {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::Render,
            Self::Summary,
            Self::Options,
            Self::Validate,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Command::Render => {
                Some(PossibleValue::new("render").help("Render the range from --start to --end"))
            }
            Command::Summary => {
                Some(PossibleValue::new("summary").help("Describe the settings"))
            }
            Command::Options => Some(
                PossibleValue::new("options").help("List the formats that can be chosen"),
            ),
            Command::Validate => Some(
                PossibleValue::new("validate").help("Check every format in the settings exists"),
            ),
        }
    }
}
