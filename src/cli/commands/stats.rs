//! Stats command implementation
//!
//! Counts rain event entries per calendar day and charts them.

use super::shared;
use crate::app::models::DailyRainCount;
use crate::cli::args::{OutputFormat, StatsArgs};
use crate::config::Config;
use anyhow::{Context, Result};
use colored::*;

/// Run the stats command
pub fn run_stats(args: &StatsArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let (from, to) = shared::resolve_range(&args.range, shared::today())?;
    let store = shared::open_store(config)?;
    let counts = store
        .rain_counts_by_day(from, to)
        .context("Failed to count rain events")?;

    match format {
        OutputFormat::Json => shared::print_json(&counts),
        OutputFormat::Table => {
            if counts.is_empty() {
                shared::print_empty("rain events", from, to);
            } else {
                print_counts(&counts);
            }
            Ok(())
        }
    }
}

/// Chart points for daily counts, labelled by date
pub fn count_points(counts: &[DailyRainCount]) -> Vec<(String, f64)> {
    counts
        .iter()
        .map(|count| (count.date.to_string(), f64::from(count.count)))
        .collect()
}

fn print_counts(counts: &[DailyRainCount]) {
    let points = count_points(counts);
    let max = points.iter().map(|(_, value)| *value).fold(0.0, f64::max);
    shared::print_chart("Rain events per day", &points, max);

    let total: u32 = counts.iter().map(|count| count.count).sum();
    println!(
        "\n{} events on {} days",
        total.to_string().bright_white(),
        counts.len().to_string().bright_white()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_count_points() {
        let counts = vec![
            DailyRainCount {
                date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                count: 3,
            },
            DailyRainCount {
                date: NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(),
                count: 1,
            },
        ];
        assert_eq!(
            count_points(&counts),
            vec![("2024-07-01".to_string(), 3.0), ("2024-07-03".to_string(), 1.0)]
        );
    }
}
