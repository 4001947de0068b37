//! Forecast command implementation
//!
//! Stores manually entered daily forecasts and lists them with a chart of
//! the mean forecast temperature.

use super::shared;
use crate::app::models::Forecast;
use crate::app::services::rain_analysis::{TemperaturePoint, mean_temperature_series};
use crate::cli::args::{ForecastAction, ForecastAddArgs, ForecastArgs, OutputFormat};
use crate::config::Config;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use tracing::info;

/// JSON output for a forecast listing
#[derive(Debug, Serialize)]
pub struct ForecastListing {
    pub forecasts: Vec<Forecast>,
    pub mean_temperatures: Vec<TemperaturePoint>,
}

/// Run the forecast command
pub fn run_forecast(args: &ForecastArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let store = shared::open_store(config)?;

    match &args.action {
        ForecastAction::Add(add) => {
            let forecast = forecast_from_args(add)?;
            let id = store
                .insert_forecast(&forecast)
                .context("Failed to store forecast")?;
            info!("Stored forecast for {} as row {}", forecast.date, id);

            match format {
                OutputFormat::Json => shared::print_json(&forecast),
                OutputFormat::Table => {
                    println!(
                        "{} forecast for {}: {} to {} °C",
                        "Stored".bright_green().bold(),
                        forecast.date,
                        shared::format_number(forecast.temp_min),
                        shared::format_number(forecast.temp_max)
                    );
                    Ok(())
                }
            }
        }
        ForecastAction::List(range) => {
            let (from, to) = shared::resolve_range(range, shared::today())?;
            let forecasts = store
                .forecasts_between(from, to)
                .context("Failed to load forecasts")?;
            let mean_temperatures = mean_temperature_series(&forecasts);

            match format {
                OutputFormat::Json => shared::print_json(&ForecastListing {
                    forecasts,
                    mean_temperatures,
                }),
                OutputFormat::Table => {
                    if forecasts.is_empty() {
                        shared::print_empty("forecasts", from, to);
                    } else {
                        print_forecasts(&forecasts, &mean_temperatures);
                    }
                    Ok(())
                }
            }
        }
    }
}

/// Build a validated forecast from command arguments
pub fn forecast_from_args(args: &ForecastAddArgs) -> Result<Forecast> {
    Forecast::new(
        args.date,
        args.wind.trim(),
        args.temp_min,
        args.temp_max,
        args.weather.trim(),
    )
    .context("Invalid forecast")
}

fn print_forecasts(forecasts: &[Forecast], means: &[TemperaturePoint]) {
    shared::print_heading("Forecasts");
    let rows: Vec<Vec<String>> = forecasts
        .iter()
        .map(|forecast| {
            vec![
                forecast.date.to_string(),
                shared::format_number(forecast.temp_min),
                shared::format_number(forecast.temp_max),
                or_blank(&forecast.wind),
                or_blank(&forecast.weather),
            ]
        })
        .collect();
    shared::print_table(&["Date", "Min °C", "Max °C", "Wind", "Weather"], &rows);

    let points: Vec<(String, f64)> = means
        .iter()
        .map(|point| (point.date.to_string(), point.mean))
        .collect();
    let max = means.iter().map(|p| p.mean).fold(0.0, f64::max);
    shared::print_chart("Mean forecast temperature (°C)", &points, max);
}

fn or_blank(text: &str) -> String {
    if text.is_empty() {
        "-".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn add_args(temp_min: f64, temp_max: f64) -> ForecastAddArgs {
        ForecastAddArgs {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            wind: " 030/05 ".to_string(),
            temp_min,
            temp_max,
            weather: "showers".to_string(),
        }
    }

    #[test]
    fn test_forecast_from_args() {
        let forecast = forecast_from_args(&add_args(25.0, 31.0)).unwrap();
        assert_eq!(forecast.wind, "030/05");
        assert_eq!(forecast.mean_temperature(), 28.0);
    }

    #[test]
    fn test_inverted_temperatures_rejected() {
        let err = forecast_from_args(&add_args(31.0, 25.0)).unwrap_err();
        assert!(format!("{:#}", err).contains("cannot be below"));
    }
}
