//! Integration tests for the SQLite store with on-disk databases
//!
//! Each test works against a fresh database file in a temporary directory,
//! decoding reports and logging forecasts and rain events the way the CLI does.

use chrono::NaiveDate;
use station_wx::app::services::rain_analysis::{
    IntensityScale, intensity_series, mean_temperature_series,
};
use station_wx::{Forecast, RainEvent, RainLevel, Store, decode};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
}

fn open(dir: &TempDir) -> Store {
    Store::open(dir.path().join("data").join("station_wx.db")).unwrap()
}

/// Test a day of station logging end to end
///
/// Purpose: Validate decode, store, reopen and range query together
/// Benefit: Mirrors the daily workflow of the station operator
#[test]
fn test_logged_day_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = open(&dir);
        for raw in [
            "METAR VVCS 011200Z 09008KT 9999 FEW020 30/24",
            "SPECI VVCS 011242Z 24015G25KT 3000 +TSRA BKN010CB 26/24",
            "METAR VVCS 011300Z 24010KT 6000 -RA BKN012 25/24",
        ] {
            let report = decode(raw, date(1), Some("VVCS")).unwrap();
            store.insert_report(&report).unwrap();
        }
        store
            .insert_forecast(&Forecast::new(date(1), "090/08", 25.0, 31.0, "showers").unwrap())
            .unwrap();
        store
            .insert_rain_event(&RainEvent::new(
                date(1).and_hms_opt(12, 40, 0).unwrap(),
                RainLevel::ThunderShower,
                "+TSRA",
                "",
            ))
            .unwrap();
    }

    let store = open(&dir);
    let rows = store.reports_between(date(1), date(1)).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.iter().filter(|row| row.is_rain).count(),
        2,
        "thunderstorm rain and light rain"
    );
    assert_eq!(rows[1].rain_type, "heavy thunderstorm rain");

    let forecasts = store.forecasts_between(date(1), date(1)).unwrap();
    assert_eq!(mean_temperature_series(&forecasts)[0].mean, 28.0);

    let events = store.rain_events_between(date(1), date(1)).unwrap();
    let series = intensity_series(&events, &IntensityScale::default());
    assert_eq!(series[0].intensity, 3.5);

    let counts = store.rain_counts_by_day(date(1), date(31)).unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].count, 1);
}

/// Test sharing one store between threads
///
/// Purpose: Ensure concurrent inserts are all committed
/// Benefit: The store is documented as Send + Sync behind an Arc
#[test]
fn test_concurrent_inserts() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open(&dir));

    let handles: Vec<_> = (0..4u32)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for minute in 0..5u32 {
                    let time = date(2).and_hms_opt(10 + worker, minute * 10, 0).unwrap();
                    store
                        .insert_rain_event(&RainEvent::new(time, RainLevel::Light, "-RA", ""))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let events = store.rain_events_between(date(2), date(2)).unwrap();
    assert_eq!(events.len(), 20);
    assert!(events.windows(2).all(|pair| pair[0].time <= pair[1].time));
}

/// Test rejected forecasts are not stored
///
/// Purpose: Validation happens before any row is written
/// Benefit: The forecasts table never holds an inverted temperature range
#[test]
fn test_invalid_forecast_not_stored() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    let inverted = Forecast {
        date: date(3),
        wind: String::new(),
        temp_min: 30.0,
        temp_max: 20.0,
        weather: String::new(),
    };
    assert!(store.insert_forecast(&inverted).is_err());
    assert!(store.forecasts_between(date(1), date(31)).unwrap().is_empty());
}
