//! Tests for rain event storage and daily counts

use super::*;
use crate::app::models::DailyRainCount;

#[test]
fn test_rain_event_round_trip() {
    let store = store();
    let event = RainEvent::new(at(2024, 7, 1, 12, 6), RainLevel::ThunderShower, "TSRA", "squall line");
    store.insert_rain_event(&event).unwrap();

    let loaded = store.rain_events_between(date(2024, 7, 1), date(2024, 7, 1)).unwrap();
    assert_eq!(loaded, vec![event]);
}

#[test]
fn test_end_date_includes_whole_day() {
    let store = store();
    store.insert_rain_event(&rain_event(at(2024, 7, 2, 23, 59), RainLevel::Light)).unwrap();
    store.insert_rain_event(&rain_event(at(2024, 7, 3, 0, 0), RainLevel::Stopped)).unwrap();

    let loaded = store.rain_events_between(date(2024, 7, 1), date(2024, 7, 2)).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].level, RainLevel::Light);
}

#[test]
fn test_rain_events_ordered_by_time() {
    let store = store();
    store.insert_rain_event(&rain_event(at(2024, 7, 1, 14, 0), RainLevel::Stopped)).unwrap();
    store.insert_rain_event(&rain_event(at(2024, 7, 1, 12, 6), RainLevel::Moderate)).unwrap();
    store.insert_rain_event(&rain_event(at(2024, 7, 1, 13, 0), RainLevel::Heavy)).unwrap();

    let levels: Vec<RainLevel> = store
        .rain_events_between(date(2024, 7, 1), date(2024, 7, 1))
        .unwrap()
        .into_iter()
        .map(|e| e.level)
        .collect();
    assert_eq!(
        levels,
        vec![RainLevel::Moderate, RainLevel::Heavy, RainLevel::Stopped]
    );
}

#[test]
fn test_rain_counts_by_day() {
    let store = store();
    for (day, hour) in [(1, 8), (1, 9), (1, 17), (3, 6), (4, 23), (6, 1)] {
        store.insert_rain_event(&rain_event(at(2024, 7, day, hour, 0), RainLevel::Light)).unwrap();
    }

    let counts = store.rain_counts_by_day(date(2024, 7, 1), date(2024, 7, 4)).unwrap();
    assert_eq!(
        counts,
        vec![
            DailyRainCount { date: date(2024, 7, 1), count: 3 },
            DailyRainCount { date: date(2024, 7, 3), count: 1 },
            DailyRainCount { date: date(2024, 7, 4), count: 1 },
        ]
    );
}

#[test]
fn test_empty_range_has_no_counts() {
    let store = store();
    assert!(store.rain_counts_by_day(date(2024, 7, 1), date(2024, 7, 31)).unwrap().is_empty());
}
