//! Precipitation classification
//!
//! Derives the rain indicator and rain type from recognized present-weather
//! groups. Both values are recomputed from the groups on demand and are never
//! stored apart from them.

use crate::app::models::Phenomenon;
use serde::{Deserialize, Serialize};

/// Rain indicator and label of the first liquid-precipitation group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precipitation {
    /// True iff any group reports rain or drizzle (including showers,
    /// thunderstorm rain and freezing rain)
    pub is_rain: bool,

    /// Label of the first such group in report order, e.g. "light rain";
    /// empty when there is none
    pub rain_type: String,
}

/// Classify a report's present-weather groups
///
/// Intensity prefixes appear in the label but do not affect membership.
pub fn classify(phenomena: &[Phenomenon]) -> Precipitation {
    match phenomena.iter().find(|p| p.is_liquid_precipitation()) {
        Some(first) => Precipitation {
            is_rain: true,
            rain_type: first.label(),
        },
        None => Precipitation::default(),
    }
}
