//! Test utilities for the report decoder
//!
//! Shared fixtures used across the decoder test modules.

use super::{DecodeContext, Decoder, Decoding};
use crate::app::models::DecodedReport;
use chrono::NaiveDate;

mod precipitation_tests;
mod tokenizer_tests;

/// The reference report used throughout the decoder tests
pub const REFERENCE_REPORT: &str = "STN1 121230Z 03005G12KT 6000 -RA BKN012 OVC025 18/15";

/// Reference date on day 12 of the month
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 12).unwrap()
}

pub fn context() -> DecodeContext {
    DecodeContext::new(reference_date())
}

/// Decode with the default test context
pub fn decode(raw: &str) -> DecodedReport {
    Decoder::new().decode(raw, &context())
}

/// Decode with the default test context, keeping diagnostics
pub fn decode_verbose(raw: &str) -> Decoding {
    Decoder::new().decode_with_diagnostics(raw, &context())
}
