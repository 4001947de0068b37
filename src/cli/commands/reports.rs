//! Reports command implementation
//!
//! Lists stored reports, either the most recently stored ones or those
//! observed within an inclusive date range.

use super::shared::{self, REPORT_HEADERS};
use crate::app::models::ReportRow;
use crate::cli::args::{OutputFormat, ReportsArgs};
use crate::config::Config;
use anyhow::{Context, Result};
use colored::*;

/// Run the reports command
pub fn run_reports(args: &ReportsArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let store = shared::open_store(config)?;
    let has_range = args.range.from.is_some() || args.range.to.is_some();

    let (title, rows) = if has_range {
        let (from, to) = shared::resolve_range(&args.range, shared::today())?;
        let rows = store
            .reports_between(from, to)
            .context("Failed to load reports")?;
        if rows.is_empty() && format == OutputFormat::Table {
            shared::print_empty("reports", from, to);
            return Ok(());
        }
        (format!("Reports {} to {}", from, to), rows)
    } else {
        let limit = args.recent.unwrap_or(config.recent_limit);
        let rows = store
            .recent_reports(limit)
            .context("Failed to load recent reports")?;
        (format!("Last {} stored reports", rows.len()), rows)
    };

    match format {
        OutputFormat::Json => shared::print_json(&rows),
        OutputFormat::Table => {
            print_reports(&title, &rows);
            Ok(())
        }
    }
}

/// Print report rows as a table followed by a rain count
pub fn print_reports(title: &str, rows: &[ReportRow]) {
    shared::print_heading(title);
    if rows.is_empty() {
        println!("{}", "No reports stored yet".bright_yellow());
        return;
    }

    let cells: Vec<Vec<String>> = rows.iter().map(shared::report_cells).collect();
    shared::print_table(REPORT_HEADERS, &cells);

    let rainy = rows.iter().filter(|row| row.is_rain).count();
    println!(
        "\n{} reports, {} with rain",
        rows.len().to_string().bright_white(),
        rainy.to_string().bright_white()
    );
}
