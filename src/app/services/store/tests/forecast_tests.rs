//! Tests for forecast storage

use super::*;
use crate::Error;
use crate::app::models::Forecast;

fn forecast(day: u32, min: f64, max: f64) -> Forecast {
    Forecast::new(date(2024, 7, day), "030/05", min, max, "scattered showers").unwrap()
}

#[test]
fn test_forecast_round_trip() {
    let store = store();
    let original = forecast(1, 25.0, 28.5);
    store.insert_forecast(&original).unwrap();

    let loaded = store.forecasts_between(date(2024, 7, 1), date(2024, 7, 1)).unwrap();
    assert_eq!(loaded, vec![original]);
}

#[test]
fn test_forecasts_ordered_by_date() {
    let store = store();
    for day in [3, 1, 2, 5] {
        store.insert_forecast(&forecast(day, 25.0, 29.0)).unwrap();
    }

    let loaded = store.forecasts_between(date(2024, 7, 1), date(2024, 7, 3)).unwrap();
    let days: Vec<NaiveDate> = loaded.iter().map(|f| f.date).collect();
    assert_eq!(days, vec![date(2024, 7, 1), date(2024, 7, 2), date(2024, 7, 3)]);
}

#[test]
fn test_invalid_forecast_is_not_stored() {
    let store = store();
    let mut bad = forecast(1, 25.0, 28.0);
    bad.temp_max = 20.0;

    let err = store.insert_forecast(&bad).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert!(
        store
            .forecasts_between(date(2024, 7, 1), date(2024, 7, 31))
            .unwrap()
            .is_empty()
    );
}
