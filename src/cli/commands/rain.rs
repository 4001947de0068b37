//! Rain command implementation
//!
//! Logs manually observed changes in rain intensity and lists them with a
//! chart of the intensity series.

use super::shared;
use crate::app::models::RainEvent;
use crate::app::services::metar_decoder::extractors;
use crate::app::services::rain_analysis::{IntensityPoint, intensity_series};
use crate::cli::args::{OutputFormat, RainAction, RainAddArgs, RainArgs};
use crate::config::Config;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use tracing::{info, warn};

/// JSON output for a rain event listing
#[derive(Debug, Serialize)]
pub struct RainListing {
    pub events: Vec<RainEvent>,
    pub intensity: Vec<IntensityPoint>,
}

/// Run the rain command
pub fn run_rain(args: &RainArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let store = shared::open_store(config)?;

    match &args.action {
        RainAction::Add(add) => {
            let event = event_from_args(add, shared::today())?;
            let id = store
                .insert_rain_event(&event)
                .context("Failed to store rain event")?;
            info!("Stored rain event at {} as row {}", event.time, id);

            match format {
                OutputFormat::Json => shared::print_json(&event),
                OutputFormat::Table => {
                    println!(
                        "{} {} at {}",
                        "Logged".bright_green().bold(),
                        event.level.to_string().bright_white(),
                        event.time.format("%Y-%m-%d %H:%M")
                    );
                    Ok(())
                }
            }
        }
        RainAction::List(range) => {
            let (from, to) = shared::resolve_range(range, shared::today())?;
            let events = store
                .rain_events_between(from, to)
                .context("Failed to load rain events")?;
            let intensity = intensity_series(&events, &config.intensity_scale);

            match format {
                OutputFormat::Json => shared::print_json(&RainListing { events, intensity }),
                OutputFormat::Table => {
                    if events.is_empty() {
                        shared::print_empty("rain events", from, to);
                    } else {
                        print_events(&events, &intensity, config.intensity_scale.max_value());
                    }
                    Ok(())
                }
            }
        }
    }
}

/// Build a rain event from command arguments
///
/// A code that is not a present-weather group is kept as entered, with a warning.
pub fn event_from_args(args: &RainAddArgs, today: chrono::NaiveDate) -> Result<RainEvent> {
    let date = args.date.unwrap_or(today);
    let time = RainEvent::time_from_parts(date, &args.time)
        .with_context(|| format!("Invalid --time '{}', expected HH:MM", args.time))?;

    let code = args.code.trim();
    if !code.is_empty() && extractors::extract_weather(code).is_none() {
        warn!("Code '{}' is not a present-weather group", code);
    }

    Ok(RainEvent::new(time, args.level, code, args.note.as_str()))
}

fn print_events(events: &[RainEvent], intensity: &[IntensityPoint], max: f64) {
    shared::print_heading("Rain events");
    let rows: Vec<Vec<String>> = events
        .iter()
        .map(|event| {
            vec![
                event.time.format("%Y-%m-%d %H:%M").to_string(),
                event.level.to_string(),
                shared::or_dash((!event.code.is_empty()).then_some(&event.code)),
                shared::or_dash((!event.note.is_empty()).then_some(&event.note)),
            ]
        })
        .collect();
    shared::print_table(&["Time", "Level", "Code", "Note"], &rows);

    let points: Vec<(String, f64)> = intensity
        .iter()
        .map(|point| (point.time.format("%m-%d %H:%M").to_string(), point.intensity))
        .collect();
    shared::print_chart("Rain intensity", &points, max);
}
