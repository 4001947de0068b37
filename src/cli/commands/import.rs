//! Import command implementation
//!
//! Decodes a text file with one report per line and stores every record.
//! All records go in regardless of how much of a report decoded; the
//! summary counts reports whose groups were not all used.

use super::decode::build_context;
use super::shared;
use crate::app::services::metar_decoder::{DecodeContext, Decoder, Decoding};
use crate::app::services::store::Store;
use crate::cli::args::{ImportArgs, OutputFormat};
use crate::config::Config;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Non-blank, non-comment lines read
    pub reports_read: usize,

    /// Records written to the database
    pub reports_stored: usize,

    /// Reports with at least one diagnostic
    pub reports_with_diagnostics: usize,

    /// Reports without a resolvable observation time
    pub reports_without_time: usize,
}

/// Report lines of an import file: trimmed, skipping blanks and `#` comments
pub fn report_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Decode every report in `contents`, storing each one when a store is given
pub fn import_reports(
    contents: &str,
    context: &DecodeContext,
    store: Option<&Store>,
) -> Result<ImportSummary> {
    let decoder = Decoder::new();
    let mut summary = ImportSummary::default();

    for (line_number, line) in report_lines(contents) {
        summary.reports_read += 1;
        let Decoding {
            report,
            diagnostics,
        } = decoder.decode_with_diagnostics(line, context);

        if !diagnostics.is_empty() {
            summary.reports_with_diagnostics += 1;
            debug!(
                "Line {}: {} group(s) not used",
                line_number,
                diagnostics.len()
            );
        }
        if report.report_time.is_none() {
            summary.reports_without_time += 1;
            warn!("Line {}: no observation time decoded", line_number);
        }

        if let Some(store) = store {
            store
                .insert_report(&report)
                .with_context(|| format!("Failed to store report from line {}", line_number))?;
            summary.reports_stored += 1;
        }
    }

    Ok(summary)
}

/// Run the import command
pub fn run_import(args: &ImportArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let contents = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let context = build_context(&args.options, config)?;
    let store = if args.options.no_store {
        None
    } else {
        Some(shared::open_store(config)?)
    };

    info!("Importing reports from {}", args.file.display());
    let summary = import_reports(&contents, &context, store.as_ref())?;

    match format {
        OutputFormat::Json => shared::print_json(&summary),
        OutputFormat::Table => {
            print_summary(&summary);
            Ok(())
        }
    }
}

fn print_summary(summary: &ImportSummary) {
    shared::print_heading("Import summary");
    println!(
        "  {:<26} {}",
        "Reports read:".bright_cyan(),
        summary.reports_read
    );
    println!(
        "  {:<26} {}",
        "Reports stored:".bright_cyan(),
        summary.reports_stored.to_string().bright_white()
    );
    if summary.reports_with_diagnostics > 0 {
        println!(
            "  {:<26} {}",
            "With unused groups:".bright_cyan(),
            summary.reports_with_diagnostics.to_string().bright_yellow()
        );
    }
    if summary.reports_without_time > 0 {
        println!(
            "  {:<26} {}",
            "Without observation time:".bright_cyan(),
            summary.reports_without_time.to_string().bright_yellow()
        );
    }
}
