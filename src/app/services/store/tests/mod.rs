//! Test utilities for the observation store
//!
//! Provides an in-memory store and record builders shared by the store test
//! modules.

use chrono::{NaiveDate, NaiveDateTime};

use super::Store;
use crate::app::models::{DecodedReport, RainEvent, RainLevel};
use crate::app::services::metar_decoder::{DecodeContext, Decoder};

// Test modules
mod forecast_tests;
mod rain_event_tests;

pub fn store() -> Store {
    Store::open_in_memory().unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, minute, 0).unwrap()
}

/// Decode a report against a July 2024 reference date
pub fn report(raw: &str, reference_day: u32) -> DecodedReport {
    Decoder::new().decode(raw, &DecodeContext::new(date(2024, 7, reference_day)))
}

pub fn rain_event(time: NaiveDateTime, level: RainLevel) -> RainEvent {
    RainEvent::new(time, level, "", "")
}
