//! Command implementations for the station-wx CLI
//!
//! Each subcommand lives in its own module. Every command loads the layered
//! configuration first, then opens the database only if it needs one.

pub mod decode;
pub mod forecast;
pub mod import;
pub mod rain;
pub mod reports;
pub mod shared;
pub mod stats;

use crate::cli::args::{Args, Commands};
use anyhow::Result;

/// Main command runner for station-wx
///
/// This function dispatches to the appropriate subcommand handler:
/// - `decode`: Decode one report and store it
/// - `import`: Decode and store a file of reports
/// - `reports`: List stored reports
/// - `forecast`: Enter or list daily forecasts
/// - `rain`: Log or list rain events
/// - `stats`: Rain events per day
pub fn run(args: Args) -> Result<()> {
    shared::setup_logging(&args.global);
    let config = shared::load_configuration(&args.global)?;
    let format = args.global.format;

    match args.command {
        Some(Commands::Decode(decode_args)) => decode::run_decode(&decode_args, &config, format),
        Some(Commands::Import(import_args)) => import::run_import(&import_args, &config, format),
        Some(Commands::Reports(reports_args)) => {
            reports::run_reports(&reports_args, &config, format)
        }
        Some(Commands::Forecast(forecast_args)) => {
            forecast::run_forecast(&forecast_args, &config, format)
        }
        Some(Commands::Rain(rain_args)) => rain::run_rain(&rain_args, &config, format),
        Some(Commands::Stats(stats_args)) => stats::run_stats(&stats_args, &config, format),
        None => anyhow::bail!("No command given; run with --help to list commands"),
    }
}
