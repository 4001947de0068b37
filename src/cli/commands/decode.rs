//! Decode command implementation
//!
//! Decodes one report against a reference date, prints every decoded field
//! with the diagnostics for groups that were not used, and stores the record
//! unless `--no-store` is given.

use super::shared::{self, or_dash};
use crate::app::models::{DecodedReport, ReportRow};
use crate::app::services::metar_decoder::{DecodeContext, Decoder, Decoding, GroupDiagnostic};
use crate::cli::args::{DecodeArgs, DecodeOptions, OutputFormat};
use crate::config::Config;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use tracing::info;

/// JSON output for one decoded report
#[derive(Debug, Serialize)]
pub struct DecodeOutput<'a> {
    /// Row id when the report was stored
    pub id: Option<i64>,
    pub report: ReportRow,
    pub diagnostics: &'a [GroupDiagnostic],
}

/// Build the decode context from command options and configuration
///
/// `--station` wins over the configured station; the reference date
/// defaults to today.
pub fn build_context(options: &DecodeOptions, config: &Config) -> Result<DecodeContext> {
    let reference_date = options.date.unwrap_or_else(shared::today);
    let context = DecodeContext::new(reference_date);

    match &options.station {
        Some(station) => context
            .with_station(station)
            .with_context(|| format!("Invalid --station '{}'", station)),
        None => Ok(context.with_station_hint(config.station_id()?)),
    }
}

/// Run the decode command
pub fn run_decode(args: &DecodeArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let text = args.report_text();
    if text.trim().is_empty() {
        anyhow::bail!("Report text is empty");
    }

    let context = build_context(&args.options, config)?;
    let decoding = Decoder::new().decode_with_diagnostics(&text, &context);

    let id = if args.options.no_store {
        None
    } else {
        let store = shared::open_store(config)?;
        let id = store
            .insert_report(&decoding.report)
            .context("Failed to store decoded report")?;
        Some(id)
    };

    match format {
        OutputFormat::Json => shared::print_json(&DecodeOutput {
            id,
            report: decoding.report.to_row(),
            diagnostics: &decoding.diagnostics,
        }),
        OutputFormat::Table => {
            print_decoding(&decoding);
            match id {
                Some(id) => info!("Stored report as row {}", id),
                None => println!("\n{}", "Not stored (--no-store)".bright_yellow()),
            }
            Ok(())
        }
    }
}

/// Print one decoded report as labelled fields followed by its diagnostics
pub fn print_decoding(decoding: &Decoding) {
    shared::print_heading("Decoded report");
    for (label, value) in report_fields(&decoding.report) {
        println!("  {:<18} {}", format!("{}:", label).bright_cyan(), value);
    }

    if !decoding.diagnostics.is_empty() {
        shared::print_heading("Groups not used");
        for diagnostic in &decoding.diagnostics {
            println!(
                "  {} {:<12} {}",
                format!("#{}", diagnostic.position).bright_white(),
                diagnostic.token,
                diagnostic.issue.to_string().bright_yellow()
            );
        }
    }
}

/// Label and display value for every field of a decoded report
pub fn report_fields(report: &DecodedReport) -> Vec<(&'static str, String)> {
    let row = report.to_row();

    let wind = match report.wind {
        Some(wind) if wind.is_calm() => "calm".to_string(),
        Some(wind) => {
            let mut text = format!("{} at {} kt", wind.direction, wind.speed_kt);
            if let Some(gust) = wind.gust_kt {
                text.push_str(&format!(", gusting {} kt", gust));
            }
            if let Some(variation) = wind.variation {
                text.push_str(&format!(
                    ", varying {:03}-{:03}",
                    variation.from_deg, variation.to_deg
                ));
            }
            text
        }
        None => "-".to_string(),
    };

    let weather = if report.present_weather.is_empty() {
        "-".to_string()
    } else {
        report
            .present_weather
            .iter()
            .map(|p| format!("{} ({})", p.code, p.label()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let clouds = if report.cloud_layers.is_empty() {
        "-".to_string()
    } else {
        report
            .cloud_layers
            .iter()
            .map(|layer| match layer.height_ft {
                Some(height) => format!("{} at {} ft", layer.coverage.label(), height),
                None => layer.coverage.label().to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    let rain = if row.is_rain {
        format!("yes, {}", row.rain_type)
    } else {
        "no".to_string()
    };

    vec![
        ("Kind", report.kind.to_string()),
        ("Station", or_dash(report.station_id.as_ref())),
        (
            "Time",
            or_dash(report.report_time.map(|t| t.format("%Y-%m-%d %H:%M"))),
        ),
        ("Wind", wind),
        ("Visibility", or_dash(report.visibility)),
        ("Temperature", or_dash(report.temperature.map(|t| format!("{} °C", t)))),
        ("Dewpoint", or_dash(report.dewpoint.map(|t| format!("{} °C", t)))),
        ("Weather", weather),
        ("Rain", rain),
        ("Clouds", clouds),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn options(date: Option<NaiveDate>, station: Option<&str>) -> DecodeOptions {
        DecodeOptions {
            date,
            station: station.map(str::to_string),
            no_store: true,
        }
    }

    #[test]
    fn test_station_option_overrides_config() {
        let config = Config::default().with_station("VVCS");
        let date = NaiveDate::from_ymd_opt(2024, 7, 12);

        let context = build_context(&options(date, Some("stn1")), &config).unwrap();
        assert_eq!(context.station_hint.as_ref().unwrap().as_str(), "STN1");
        assert_eq!(Some(context.reference_date), date);

        let context = build_context(&options(date, None), &config).unwrap();
        assert_eq!(context.station_hint.as_ref().unwrap().as_str(), "VVCS");
    }

    #[test]
    fn test_invalid_station_option_rejected() {
        let result = build_context(&options(None, Some("TOO-LONG")), &Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_report_fields() {
        let config = Config::default();
        let context =
            build_context(&options(NaiveDate::from_ymd_opt(2024, 7, 12), None), &config).unwrap();
        let report = Decoder::new().decode(
            "METAR STN1 121230Z 03005G12KT 6000 -RA BKN012 OVC025 18/15",
            &context,
        );

        let fields = report_fields(&report);
        let value = |label: &str| {
            fields
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.clone())
                .unwrap()
        };

        assert_eq!(value("Station"), "STN1");
        assert_eq!(value("Time"), "2024-07-12 12:30");
        assert_eq!(value("Temperature"), "18 °C");
        assert!(value("Wind").contains("gusting 12 kt"));
        assert!(value("Rain").starts_with("yes"));
        assert!(value("Clouds").contains("1200 ft"));
    }

    #[test]
    fn test_unknown_fields_show_dash() {
        let fields = report_fields(&DecodedReport::unknown("garbage"));
        for (label, value) in fields {
            match label {
                "Kind" => assert_eq!(value, "METAR"),
                "Rain" => assert_eq!(value, "no"),
                _ => assert_eq!(value, "-", "{} should be unknown", label),
            }
        }
    }
}
