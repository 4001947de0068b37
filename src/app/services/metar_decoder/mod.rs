//! METAR/SPECI report decoder
//!
//! This module turns raw aviation weather report text into a [`DecodedReport`].
//! The report grammar is positional-but-optional: groups may be missing,
//! abbreviated, reordered or malformed. Instead of a fixed-position parser the
//! decoder runs a set of independent group matchers over every group.
//!
//! ## Architecture
//!
//! The decoder is a four-stage pipeline:
//! - [`tokenizer`] - Splits raw text into ordered groups
//! - [`extractors`] - Per-group grammars (wind, visibility, temperature, cloud, weather)
//! - [`precipitation`] - Rain indicator and rain type from present weather
//! - [`assembler`] - Merges extractor output into the final record
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use station_wx::app::services::metar_decoder::{DecodeContext, Decoder};
//!
//! let context = DecodeContext::new(NaiveDate::from_ymd_opt(2024, 7, 12).unwrap());
//! let decoding = Decoder::new()
//!     .decode_with_diagnostics("METAR VVCS 121230Z 03005G12KT 6000 -RA BKN012 18/15 Q1009", &context);
//!
//! assert_eq!(decoding.report.temperature, Some(18));
//! assert_eq!(decoding.diagnostics.len(), 1); // Q1009 is not decoded
//! ```

pub mod assembler;
pub mod extractors;
pub mod precipitation;
pub mod tokenizer;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use assembler::{
    DecodeContext, Decoder, Decoding, GroupDiagnostic, GroupIssue, resolve_report_time,
};
pub use extractors::FieldKind;
pub use precipitation::Precipitation;

use crate::Result;
use crate::app::models::DecodedReport;
use chrono::NaiveDate;

/// Decode one report against a reference date and optional station hint
///
/// Only an invalid station hint is an error; any report text decodes.
pub fn decode(
    raw: &str,
    reference_date: NaiveDate,
    station_hint: Option<&str>,
) -> Result<DecodedReport> {
    let mut context = DecodeContext::new(reference_date);
    if let Some(station) = station_hint {
        context = context.with_station(station)?;
    }
    Ok(Decoder::new().decode(raw, &context))
}
