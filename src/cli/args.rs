//! Command-line argument definitions for station-wx
//!
//! This module defines the complete CLI interface using the clap derive API:
//! report decoding and import, listing stored reports, and entering and
//! reviewing forecasts and rain events.

use crate::app::models::RainLevel;
use crate::constants::DATE_FORMAT;
use crate::{Error, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the station weather log
///
/// Decodes METAR/SPECI reports and keeps them, together with manually entered
/// forecasts and rain events, in a local SQLite database.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "station-wx",
    version,
    about = "Decode METAR/SPECI reports and log station forecasts and rain events",
    long_about = "A weather log for a single airport station. Decodes raw METAR/SPECI report \
                  text into structured records, stores them in a local SQLite database alongside \
                  manually entered daily forecasts and minute-precision rain events, and shows \
                  tables and text charts of the history."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options accepted by every subcommand
#[derive(Debug, Clone, clap::Args)]
pub struct GlobalArgs {
    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// config.toml in the user configuration directory under station-wx/.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// SQLite database file, overriding configuration and environment
    #[arg(
        long = "database",
        value_name = "FILE",
        global = true,
        help = "SQLite database file"
    )]
    pub database: Option<PathBuf>,

    /// Output format for results
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        global = true,
        help = "Output format for results"
    )]
    pub format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show warnings and errors in the log
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Only log warnings and errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Decode one report, show the result and store it
    Decode(DecodeArgs),
    /// Decode and store every report in a text file
    Import(ImportArgs),
    /// List stored reports
    Reports(ReportsArgs),
    /// Enter or list daily forecasts
    Forecast(ForecastArgs),
    /// Log or list rain events
    Rain(RainArgs),
    /// Rain events per day
    Stats(StatsArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and charts
    Table,
    /// JSON for scripting
    Json,
}

/// Arguments shared by report decoding commands
#[derive(Debug, Clone, clap::Args)]
pub struct DecodeOptions {
    /// Reference date for the report's day-of-month (YYYY-MM-DD, default today)
    #[arg(long = "date", value_name = "DATE", value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Station assumed when a report has no identifier
    #[arg(long = "station", value_name = "ICAO")]
    pub station: Option<String>,

    /// Decode without writing to the database
    #[arg(long = "no-store")]
    pub no_store: bool,
}

/// Arguments for the decode command
#[derive(Debug, Clone, Parser)]
pub struct DecodeArgs {
    /// Raw report text; several arguments are joined with spaces
    ///
    /// Options must come before the text, since groups such as `-RA` start
    /// with a hyphen.
    #[arg(
        value_name = "TEXT",
        required = true,
        num_args = 1..,
        allow_hyphen_values = true
    )]
    pub text: Vec<String>,

    #[command(flatten)]
    pub options: DecodeOptions,
}

impl DecodeArgs {
    /// The report text as one string
    pub fn report_text(&self) -> String {
        self.text.join(" ")
    }
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Text file with one report per line; blank lines and `#` comments are skipped
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub options: DecodeOptions,
}

/// Inclusive date range
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DateRangeArgs {
    /// First date of the range (YYYY-MM-DD, default 30 days before --to)
    #[arg(long = "from", value_name = "DATE", value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last date of the range, inclusive (YYYY-MM-DD, default today)
    #[arg(long = "to", value_name = "DATE", value_parser = parse_date)]
    pub to: Option<NaiveDate>,
}

/// Arguments for the reports command
#[derive(Debug, Clone, Parser)]
pub struct ReportsArgs {
    #[command(flatten)]
    pub range: DateRangeArgs,

    /// Number of most recently stored reports to show
    ///
    /// Without a date range the recent reports are shown, by default as many
    /// as the configured recent_limit.
    #[arg(
        long = "recent",
        value_name = "COUNT",
        conflicts_with_all = ["from", "to"]
    )]
    pub recent: Option<usize>,
}

/// Arguments for the forecast command
#[derive(Debug, Clone, Parser)]
pub struct ForecastArgs {
    #[command(subcommand)]
    pub action: ForecastAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ForecastAction {
    /// Store a daily forecast
    Add(ForecastAddArgs),
    /// List forecasts with a mean temperature chart
    List(DateRangeArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct ForecastAddArgs {
    /// Forecast date (YYYY-MM-DD)
    #[arg(long = "date", value_name = "DATE", value_parser = parse_date)]
    pub date: NaiveDate,

    /// Wind, free text (e.g. "030/05")
    #[arg(long = "wind", default_value = "")]
    pub wind: String,

    /// Minimum temperature in degrees Celsius
    #[arg(long = "min", value_name = "CELSIUS", allow_negative_numbers = true)]
    pub temp_min: f64,

    /// Maximum temperature in degrees Celsius
    #[arg(long = "max", value_name = "CELSIUS", allow_negative_numbers = true)]
    pub temp_max: f64,

    /// Weather, free text
    #[arg(long = "weather", default_value = "")]
    pub weather: String,
}

/// Arguments for the rain command
#[derive(Debug, Clone, Parser)]
pub struct RainArgs {
    #[command(subcommand)]
    pub action: RainAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum RainAction {
    /// Log a change in rain intensity
    Add(RainAddArgs),
    /// List rain events with an intensity chart
    List(DateRangeArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct RainAddArgs {
    /// Event date (YYYY-MM-DD, default today)
    #[arg(long = "date", value_name = "DATE", value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Event time of day (HH:MM)
    #[arg(long = "time", value_name = "HH:MM")]
    pub time: String,

    /// Rain level: stopped, drizzle, light, moderate, heavy, torrential, thunder-shower
    #[arg(long = "level", value_name = "LEVEL")]
    pub level: RainLevel,

    /// Matching report weather code, e.g. -RA or TSRA
    #[arg(long = "code", default_value = "", allow_hyphen_values = true)]
    pub code: String,

    /// Free-text note
    #[arg(long = "note", default_value = "")]
    pub note: String,
}

/// Arguments for the stats command
#[derive(Debug, Clone, Parser)]
pub struct StatsArgs {
    #[command(flatten)]
    pub range: DateRangeArgs,
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| Error::invalid_timestamp(value, "YYYY-MM-DD", e))
}

impl GlobalArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}
