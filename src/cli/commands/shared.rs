//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading, store access and the
//! plain-text table and chart rendering used by every command.

use crate::app::models::{CloudSlot, ReportRow};
use crate::app::services::store::Store;
use crate::cli::args::{DateRangeArgs, GlobalArgs};
use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use colored::*;
use serde::Serialize;
use std::fmt::Display;
use tracing::{debug, info};

/// Days covered by a date range when only its end is given
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Width of the longest bar in text charts
pub const CHART_WIDTH: usize = 40;

/// Set up structured logging
pub fn setup_logging(args: &GlobalArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("station_wx={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Load configuration using the layered approach (file -> env -> args)
pub fn load_configuration(args: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load_layered(args.config_file.as_deref())
        .context("Failed to load configuration")?;

    if let Some(database) = &args.database {
        config.database_path = database.clone();
    }

    config.validate().context("Invalid configuration")?;
    debug!("Configuration: {:?}", config);
    Ok(config)
}

/// Open the configured database
pub fn open_store(config: &Config) -> Result<Store> {
    info!("Using database {}", config.database_path.display());
    Store::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database {}",
            config.database_path.display()
        )
    })
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolve an optional date range to concrete inclusive bounds
///
/// `to` defaults to `today`; `from` defaults to [`DEFAULT_RANGE_DAYS`] before `to`.
pub fn resolve_range(range: &DateRangeArgs, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let to = range.to.unwrap_or(today);
    let from = match range.from {
        Some(from) => from,
        None => to
            .checked_sub_signed(chrono::Duration::days(DEFAULT_RANGE_DAYS))
            .context("Date range start is out of range")?,
    };

    if from > to {
        anyhow::bail!("--from {} is after --to {}", from, to);
    }
    Ok((from, to))
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Render an optional value, with `-` for unknown
pub fn or_dash<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Section heading
pub fn print_heading(title: &str) {
    println!("\n{}", title.bright_green().bold());
}

/// Message shown when a query returns nothing
pub fn print_empty(what: &str, from: NaiveDate, to: NaiveDate) {
    println!("{} {} between {} and {}", "No".bright_yellow(), what, from, to);
}

// =============================================================================
// Tables
// =============================================================================

/// Render rows as a left-aligned text table with a header line
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.iter().map(|h| h.to_string()).collect()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_row(row.clone()));
    }
    lines
}

/// Print a table, highlighting the header line
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for (index, line) in render_table(headers, rows).into_iter().enumerate() {
        if index == 0 {
            println!("{}", line.bright_cyan().bold());
        } else {
            println!("{}", line);
        }
    }
}

/// Column headers for report rows, in output-schema order
pub const REPORT_HEADERS: &[&str] = &[
    "Time", "Station", "Wind", "Gust", "Vis", "Temp", "Dew", "Weather", "Rain", "Rain type",
    "Cloud 1", "Cloud 2", "Cloud 3", "Kind",
];

fn cloud_cell(slot: &CloudSlot) -> String {
    match (slot.coverage, slot.height_ft) {
        (None, _) => "-".to_string(),
        (Some(coverage), Some(height)) => format!("{} {}ft", coverage, height),
        (Some(coverage), None) => coverage.to_string(),
    }
}

/// Table cells for one report row
pub fn report_cells(row: &ReportRow) -> Vec<String> {
    let wind = match (row.wind_direction, row.wind_speed_kt) {
        (Some(direction), Some(speed)) => format!("{}/{}kt", direction, speed),
        _ => "-".to_string(),
    };

    let mut cells = vec![
        or_dash(row.report_time.map(|t| t.format("%Y-%m-%d %H:%M"))),
        or_dash(row.station_id.as_deref()),
        wind,
        or_dash(row.wind_gust_kt),
        or_dash(row.visibility),
        or_dash(row.temperature),
        or_dash(row.dewpoint),
        if row.weather_phenomena.is_empty() {
            "-".to_string()
        } else {
            row.weather_phenomena.clone()
        },
        if row.is_rain { "yes" } else { "no" }.to_string(),
        if row.rain_type.is_empty() {
            "-".to_string()
        } else {
            row.rain_type.clone()
        },
    ];
    cells.extend(row.cloud_layers.iter().map(cloud_cell));
    cells.push(row.kind.to_string());
    cells
}

// =============================================================================
// Charts
// =============================================================================

/// Render labelled horizontal bars scaled so `max` fills [`CHART_WIDTH`]
///
/// Negative values draw an empty bar; the value itself is always printed.
pub fn render_bar_chart(points: &[(String, f64)], max: f64) -> Vec<String> {
    let label_width = points
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    points
        .iter()
        .map(|(label, value)| {
            let length = if max > 0.0 && *value > 0.0 {
                ((value / max) * CHART_WIDTH as f64).round() as usize
            } else {
                0
            };
            format!(
                "{:<label_width$}  {:<chart_width$}  {}",
                label,
                "#".repeat(length.min(CHART_WIDTH)),
                format_number(*value),
                label_width = label_width,
                chart_width = CHART_WIDTH,
            )
        })
        .collect()
}

/// Print a chart under a heading
pub fn print_chart(title: &str, points: &[(String, f64)], max: f64) {
    print_heading(title);
    for line in render_bar_chart(points, max) {
        println!("{}", line);
    }
}

/// Format a number without a trailing `.0` for whole values
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{DecodedReport, RainLevel};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
    }

    #[test]
    fn test_resolve_range_defaults() {
        let (from, to) = resolve_range(&DateRangeArgs::default(), date(31)).unwrap();
        assert_eq!(to, date(31));
        assert_eq!(from, date(1));
    }

    #[test]
    fn test_resolve_range_explicit() {
        let range = DateRangeArgs {
            from: Some(date(3)),
            to: Some(date(5)),
        };
        assert_eq!(resolve_range(&range, date(31)).unwrap(), (date(3), date(5)));

        let inverted = DateRangeArgs {
            from: Some(date(5)),
            to: Some(date(3)),
        };
        assert!(resolve_range(&inverted, date(31)).is_err());
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let lines = render_table(
            &["A", "Long header"],
            &[vec!["wide cell".to_string(), "x".to_string()]],
        );
        assert_eq!(lines[0], "A          Long header");
        assert_eq!(lines[1], "---------  -----------");
        assert_eq!(lines[2], "wide cell  x");
    }

    #[test]
    fn test_unknown_report_fields_render_as_dash() {
        let cells = report_cells(&DecodedReport::unknown("garbage").to_row());
        assert_eq!(cells.len(), REPORT_HEADERS.len());
        assert_eq!(cells[0], "-");
        assert_eq!(cells[2], "-");
        assert_eq!(cells[5], "-");
        assert_eq!(cells[8], "no");
        assert_eq!(cells[13], "METAR");
    }

    #[test]
    fn test_bar_chart_scaling() {
        let points = vec![
            (RainLevel::Light.to_string(), 1.0),
            (RainLevel::Torrential.to_string(), 4.0),
            (RainLevel::Stopped.to_string(), 0.0),
        ];
        let lines = render_bar_chart(&points, 4.0);

        assert_eq!(lines[0].matches('#').count(), CHART_WIDTH / 4);
        assert_eq!(lines[1].matches('#').count(), CHART_WIDTH);
        assert_eq!(lines[2].matches('#').count(), 0);
        assert!(lines[1].ends_with("  4"));
        assert!(lines[0].starts_with("light     "));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(26.25), "26.2");
    }
}
