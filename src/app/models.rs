//! Data models for station_wx
//!
//! This module contains the core data structures for decoded weather reports,
//! their flat storage/display row, manually entered forecasts and precipitation
//! events. Every field that a report may omit is an explicit `Option`; no numeric
//! sentinel ever stands in for "not observed".

use crate::app::services::metar_decoder::precipitation::{self, Precipitation};
use crate::constants::{self, EVENT_TIME_FORMAT, WEATHER_DESCRIPTORS, WEATHER_TYPES};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Station Identifier
// =============================================================================

/// Four-character station identifier (e.g., "VVCS")
///
/// The first character is a letter; the rest are letters or digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier, accepting lower-case input
    pub fn parse(value: &str) -> Result<Self> {
        let candidate = value.trim().to_ascii_uppercase();
        if Self::is_valid(&candidate) {
            Ok(Self(candidate))
        } else {
            Err(Error::usage(format!(
                "Invalid station identifier '{}': expected 4 characters, a letter followed by letters or digits",
                value
            )))
        }
    }

    /// Check whether an (already upper-case) token is a station identifier
    pub fn is_valid(candidate: &str) -> bool {
        let bytes = candidate.as_bytes();
        bytes.len() == 4
            && bytes[0].is_ascii_uppercase()
            && bytes[1..]
                .iter()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StationId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StationId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

// =============================================================================
// Report Kind
// =============================================================================

/// Whether a report was issued on the routine cadence or as a special report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReportKind {
    /// Routine report (METAR, or no type marker)
    #[default]
    Routine,

    /// Special, irregular report (SPECI)
    Special,
}

impl ReportKind {
    /// Map a leading type marker to a report kind
    pub fn from_marker(token: &str) -> Option<Self> {
        match token {
            constants::ROUTINE_MARKER => Some(Self::Routine),
            constants::SPECIAL_MARKER => Some(Self::Special),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Routine => constants::ROUTINE_MARKER,
            Self::Special => constants::SPECIAL_MARKER,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_marker(s)
            .ok_or_else(|| Error::validation(format!("Unknown report kind '{}'", s)))
    }
}

// =============================================================================
// Wind
// =============================================================================

/// Plain JSON form of the report values that are either a number or a marker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ScalarRepr {
    Number(u32),
    Marker(String),
}

/// Mean wind direction
///
/// Serializes as the number of degrees, or `"VRB"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ScalarRepr", into = "ScalarRepr")]
pub enum WindDirection {
    /// Direction the wind blows from, in degrees (0-360)
    Degrees(u16),

    /// Direction too variable to report (VRB)
    Variable,
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degrees(deg) => write!(f, "{:03}", deg),
            Self::Variable => f.write_str("VRB"),
        }
    }
}

impl FromStr for WindDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "VRB" {
            return Ok(Self::Variable);
        }
        match s.parse::<u16>() {
            Ok(deg) if deg <= constants::MAX_WIND_DIRECTION => Ok(Self::Degrees(deg)),
            _ => Err(Error::validation(format!("Invalid wind direction '{}'", s))),
        }
    }
}

impl From<WindDirection> for ScalarRepr {
    fn from(direction: WindDirection) -> Self {
        match direction {
            WindDirection::Degrees(deg) => Self::Number(u32::from(deg)),
            WindDirection::Variable => Self::Marker(direction.to_string()),
        }
    }
}

impl TryFrom<ScalarRepr> for WindDirection {
    type Error = Error;

    fn try_from(value: ScalarRepr) -> Result<Self> {
        match value {
            ScalarRepr::Number(deg) => deg.to_string().parse(),
            ScalarRepr::Marker(marker) => marker.parse(),
        }
    }
}

/// Sector across which the wind direction varied (e.g., `180V240`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindVariation {
    pub from_deg: u16,
    pub to_deg: u16,
}

/// Surface wind, with speeds normalized to knots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wind {
    pub direction: WindDirection,

    /// Mean speed in knots
    pub speed_kt: u16,

    /// Gust speed in knots, only when explicitly reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gust_kt: Option<u16>,

    /// Direction variation sector, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<WindVariation>,
}

impl Wind {
    /// Calm wind is a known value: direction 0, speed 0
    pub fn is_calm(&self) -> bool {
        self.direction == WindDirection::Degrees(0) && self.speed_kt == 0
    }
}

// =============================================================================
// Visibility
// =============================================================================

/// Prevailing visibility
///
/// Serializes as metres, or `"CAVOK"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScalarRepr", into = "ScalarRepr")]
pub enum Visibility {
    /// Visibility distance in metres
    Distance(u32),

    /// Ceiling and visibility OK (CAVOK)
    Unlimited,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distance(metres) => write!(f, "{}", metres),
            Self::Unlimited => f.write_str(constants::CAVOK_MARKER),
        }
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == constants::CAVOK_MARKER {
            return Ok(Self::Unlimited);
        }
        s.parse::<u32>()
            .map(Self::Distance)
            .map_err(|_| Error::validation(format!("Invalid visibility '{}'", s)))
    }
}

impl From<Visibility> for ScalarRepr {
    fn from(visibility: Visibility) -> Self {
        match visibility {
            Visibility::Distance(metres) => Self::Number(metres),
            Visibility::Unlimited => Self::Marker(visibility.to_string()),
        }
    }
}

impl TryFrom<ScalarRepr> for Visibility {
    type Error = Error;

    fn try_from(value: ScalarRepr) -> Result<Self> {
        match value {
            ScalarRepr::Number(metres) => Ok(Self::Distance(metres)),
            ScalarRepr::Marker(marker) => marker.parse(),
        }
    }
}

// =============================================================================
// Clouds
// =============================================================================

/// Sky cover fraction of a cloud layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coverage {
    Clear,
    Few,
    Scattered,
    Broken,
    Overcast,
}

impl Coverage {
    /// Map a three-letter layer code to a coverage
    ///
    /// `VV` (sky obscured, vertical visibility given) is treated as overcast.
    pub fn from_layer_code(code: &str) -> Option<Self> {
        match code {
            "FEW" => Some(Self::Few),
            "SCT" => Some(Self::Scattered),
            "BKN" => Some(Self::Broken),
            "OVC" | "VV" => Some(Self::Overcast),
            _ => None,
        }
    }

    /// Codes meaning no cloud was detected or reported
    pub fn is_clear_code(code: &str) -> bool {
        matches!(code, "SKC" | "CLR" | "NSC" | "NCD")
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Clear => "CLR",
            Self::Few => "FEW",
            Self::Scattered => "SCT",
            Self::Broken => "BKN",
            Self::Overcast => "OVC",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Few => "few",
            Self::Scattered => "scattered",
            Self::Broken => "broken",
            Self::Overcast => "overcast",
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Coverage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CLR" => Ok(Self::Clear),
            other => Self::from_layer_code(other)
                .ok_or_else(|| Error::validation(format!("Unknown cloud coverage '{}'", s))),
        }
    }
}

/// One reported cloud layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudLayer {
    pub coverage: Coverage,

    /// Cloud base in feet; unknown when not reported or when there is no ceiling
    pub height_ft: Option<u32>,
}

impl CloudLayer {
    pub fn new(coverage: Coverage, height_ft: Option<u32>) -> Self {
        Self {
            coverage,
            height_ft,
        }
    }

    /// The synthetic layer produced by a "no cloud" group
    pub fn clear() -> Self {
        Self::new(Coverage::Clear, None)
    }
}

// =============================================================================
// Present Weather
// =============================================================================

/// Intensity or proximity qualifier of a present-weather group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Intensity {
    /// `-`
    Light,
    /// no prefix
    #[default]
    Moderate,
    /// `+`
    Heavy,
    /// `VC`, in the vicinity of the station
    Vicinity,
}

impl Intensity {
    pub fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "-" => Self::Light,
            "+" => Self::Heavy,
            "VC" => Self::Vicinity,
            _ => Self::Moderate,
        }
    }

    /// Word used in labels; empty for moderate
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "",
            Self::Heavy => "heavy",
            Self::Vicinity => "vicinity",
        }
    }
}

/// A recognized present-weather group, e.g. `-RA`, `+TSRA`, `VCSH`, `BR`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phenomenon {
    /// The group exactly as it appeared in the report
    pub code: String,
    pub intensity: Intensity,
    pub descriptor: Option<String>,
    pub types: Vec<String>,
}

impl Phenomenon {
    /// Whether any type code is liquid precipitation (rain or drizzle)
    pub fn is_liquid_precipitation(&self) -> bool {
        self.types
            .iter()
            .any(|t| constants::LIQUID_PRECIPITATION_TYPES.contains(&t.as_str()))
    }

    /// Short human-readable label, e.g. "light rain", "thunderstorm rain"
    pub fn label(&self) -> String {
        let mut words: Vec<&str> = Vec::new();

        let intensity = self.intensity.label();
        if !intensity.is_empty() {
            words.push(intensity);
        }
        if let Some(descriptor) = &self.descriptor {
            words.push(lookup_label(WEATHER_DESCRIPTORS, descriptor));
        }
        for t in &self.types {
            words.push(lookup_label(WEATHER_TYPES, t));
        }

        words.join(" ")
    }
}

fn lookup_label(table: &[(&str, &'static str)], code: &str) -> &'static str {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or("unknown")
}

// =============================================================================
// Decoded Report
// =============================================================================

/// Structured record decoded from one METAR/SPECI report
///
/// Created once per decode call and never mutated afterwards; a correction
/// is a new decode and a new insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedReport {
    pub kind: ReportKind,

    /// Observation time resolved against the caller's reference date
    pub report_time: Option<NaiveDateTime>,

    pub station_id: Option<StationId>,

    /// Verbatim input text
    pub raw_text: String,

    pub wind: Option<Wind>,
    pub visibility: Option<Visibility>,

    /// Air temperature, whole degrees Celsius
    pub temperature: Option<i16>,

    /// Dewpoint, whole degrees Celsius
    pub dewpoint: Option<i16>,

    /// Recognized present-weather groups in report order
    pub present_weather: Vec<Phenomenon>,

    /// At most three layers, in report order
    pub cloud_layers: Vec<CloudLayer>,
}

impl DecodedReport {
    /// A record with every decoded field unknown
    pub fn unknown(raw_text: impl Into<String>) -> Self {
        Self {
            kind: ReportKind::Routine,
            report_time: None,
            station_id: None,
            raw_text: raw_text.into(),
            wind: None,
            visibility: None,
            temperature: None,
            dewpoint: None,
            present_weather: Vec::new(),
            cloud_layers: Vec::new(),
        }
    }

    /// All recognized present-weather groups joined by spaces
    pub fn weather_phenomena(&self) -> String {
        self.present_weather
            .iter()
            .map(|p| p.code.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Rain classification derived from the present-weather groups
    pub fn precipitation(&self) -> Precipitation {
        precipitation::classify(&self.present_weather)
    }

    pub fn is_rain(&self) -> bool {
        self.precipitation().is_rain
    }

    pub fn rain_type(&self) -> String {
        self.precipitation().rain_type
    }

    /// Flatten into the storage/display row
    pub fn to_row(&self) -> ReportRow {
        let precipitation = self.precipitation();
        let mut cloud_layers = [CloudSlot::default(); constants::MAX_CLOUD_LAYERS];
        for (slot, layer) in cloud_layers.iter_mut().zip(&self.cloud_layers) {
            *slot = CloudSlot::from(*layer);
        }

        ReportRow {
            report_time: self.report_time,
            station_id: self.station_id.as_ref().map(|s| s.to_string()),
            raw_text: self.raw_text.clone(),
            wind_direction: self.wind.map(|w| w.direction),
            wind_speed_kt: self.wind.map(|w| w.speed_kt),
            wind_gust_kt: self.wind.and_then(|w| w.gust_kt),
            visibility: self.visibility,
            temperature: self.temperature,
            dewpoint: self.dewpoint,
            weather_phenomena: self.weather_phenomena(),
            is_rain: precipitation.is_rain,
            rain_type: precipitation.rain_type,
            cloud_layers,
            kind: self.kind,
        }
    }
}

// =============================================================================
// Report Row
// =============================================================================

/// One cloud column pair of a report row; both empty when no layer was reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudSlot {
    pub coverage: Option<Coverage>,
    pub height_ft: Option<u32>,
}

impl From<CloudLayer> for CloudSlot {
    fn from(layer: CloudLayer) -> Self {
        Self {
            coverage: Some(layer.coverage),
            height_ft: layer.height_ft,
        }
    }
}

/// Flat report record in the order used for storage and display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub report_time: Option<NaiveDateTime>,
    pub station_id: Option<String>,
    pub raw_text: String,
    pub wind_direction: Option<WindDirection>,
    pub wind_speed_kt: Option<u16>,
    pub wind_gust_kt: Option<u16>,
    pub visibility: Option<Visibility>,
    pub temperature: Option<i16>,
    pub dewpoint: Option<i16>,
    pub weather_phenomena: String,
    pub is_rain: bool,
    pub rain_type: String,
    pub cloud_layers: [CloudSlot; constants::MAX_CLOUD_LAYERS],
    pub kind: ReportKind,
}

impl ReportRow {
    /// Serialize as one JSON object; unknown fields become `null`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// =============================================================================
// Forecast
// =============================================================================

/// Manually entered daily forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub date: NaiveDate,

    /// Free-text wind, e.g. "030/05"
    pub wind: String,

    /// Minimum temperature, degrees Celsius
    pub temp_min: f64,

    /// Maximum temperature, degrees Celsius
    pub temp_max: f64,

    /// Free-text weather description
    pub weather: String,
}

impl Forecast {
    /// Create a new forecast with validation
    pub fn new(
        date: NaiveDate,
        wind: impl Into<String>,
        temp_min: f64,
        temp_max: f64,
        weather: impl Into<String>,
    ) -> Result<Self> {
        let forecast = Self {
            date,
            wind: wind.into(),
            temp_min,
            temp_max,
            weather: weather.into(),
        };

        forecast.validate()?;
        Ok(forecast)
    }

    /// Validate temperature values
    pub fn validate(&self) -> Result<()> {
        if !self.temp_min.is_finite() || !self.temp_max.is_finite() {
            return Err(Error::validation(
                "Forecast temperatures must be finite numbers".to_string(),
            ));
        }

        if self.temp_max < self.temp_min {
            return Err(Error::validation(format!(
                "Maximum temperature {:.1} cannot be below minimum temperature {:.1}",
                self.temp_max, self.temp_min
            )));
        }

        Ok(())
    }

    /// Midpoint of the forecast range
    pub fn mean_temperature(&self) -> f64 {
        (self.temp_min + self.temp_max) / 2.0
    }
}

// =============================================================================
// Rain Events
// =============================================================================

/// Manually observed rain intensity at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RainLevel {
    Stopped,
    Drizzle,
    Light,
    Moderate,
    Heavy,
    Torrential,
    ThunderShower,
}

impl RainLevel {
    pub const ALL: [RainLevel; 7] = [
        Self::Drizzle,
        Self::Light,
        Self::Moderate,
        Self::Heavy,
        Self::Torrential,
        Self::ThunderShower,
        Self::Stopped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Drizzle => "drizzle",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
            Self::Torrential => "torrential",
            Self::ThunderShower => "thunder-shower",
        }
    }
}

impl fmt::Display for RainLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RainLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|l| l.as_str()).collect();
                Error::validation(format!(
                    "Unknown rain level '{}': expected one of {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// A logged change in precipitation, at minute precision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainEvent {
    pub time: NaiveDateTime,
    pub level: RainLevel,

    /// Matching report code such as "-RA" or "TSRA"; may be empty
    pub code: String,

    /// Free-text note; may be empty
    pub note: String,
}

impl RainEvent {
    /// Create a new event; seconds are truncated to minute precision
    pub fn new(
        time: NaiveDateTime,
        level: RainLevel,
        code: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        let time = time.with_second(0).unwrap_or(time);
        let time = time.with_nanosecond(0).unwrap_or(time);
        Self {
            time,
            level,
            code: code.into().trim().to_string(),
            note: note.into().trim().to_string(),
        }
    }

    /// Parse an event time of the form `YYYY-MM-DD HH:MM`
    pub fn parse_time(value: &str) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value.trim(), EVENT_TIME_FORMAT)
            .map_err(|e| Error::invalid_timestamp(value, "YYYY-MM-DD HH:MM", e))
    }

    /// Combine a date with an `HH:MM` time of day
    pub fn time_from_parts(date: NaiveDate, time_of_day: &str) -> Result<NaiveDateTime> {
        Self::parse_time(&format!("{} {}", date.format("%Y-%m-%d"), time_of_day.trim()))
    }
}

/// Number of rain event entries logged on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRainCount {
    pub date: NaiveDate,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phenomenon(code: &str, intensity: Intensity, descriptor: Option<&str>, types: &[&str]) -> Phenomenon {
        Phenomenon {
            code: code.to_string(),
            intensity,
            descriptor: descriptor.map(str::to_string),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    mod station_id_tests {
        use super::*;

        #[test]
        fn test_station_id_parse_valid() {
            assert_eq!(StationId::parse("VVCS").unwrap().as_str(), "VVCS");
            assert_eq!(StationId::parse(" stn1 ").unwrap().as_str(), "STN1");
        }

        #[test]
        fn test_station_id_parse_invalid() {
            for bad in ["", "VVC", "VVCSX", "1VCS", "VV-S"] {
                let err = StationId::parse(bad).unwrap_err();
                assert!(matches!(err, Error::Usage { .. }), "{} should be rejected", bad);
            }
        }

        #[test]
        fn test_station_id_serde_roundtrip() {
            let id = StationId::parse("VVCS").unwrap();
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, "\"VVCS\"");
            assert!(serde_json::from_str::<StationId>("\"12\"").is_err());
        }
    }

    #[test]
    fn test_wind_direction_display_and_parse() {
        assert_eq!(WindDirection::Degrees(30).to_string(), "030");
        assert_eq!(WindDirection::Variable.to_string(), "VRB");
        assert_eq!("030".parse::<WindDirection>().unwrap(), WindDirection::Degrees(30));
        assert!("370".parse::<WindDirection>().is_err());
    }

    #[test]
    fn test_calm_wind_is_known() {
        let calm = Wind {
            direction: WindDirection::Degrees(0),
            speed_kt: 0,
            gust_kt: None,
            variation: None,
        };
        assert!(calm.is_calm());
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!("CAVOK".parse::<Visibility>().unwrap(), Visibility::Unlimited);
        assert_eq!("6000".parse::<Visibility>().unwrap(), Visibility::Distance(6000));
        assert!("far".parse::<Visibility>().is_err());
    }

    #[test]
    fn test_coverage_codes() {
        assert_eq!(Coverage::from_layer_code("BKN"), Some(Coverage::Broken));
        assert_eq!(Coverage::from_layer_code("VV"), Some(Coverage::Overcast));
        assert_eq!(Coverage::from_layer_code("CLR"), None);
        assert!(Coverage::is_clear_code("NCD"));
        assert_eq!("CLR".parse::<Coverage>().unwrap(), Coverage::Clear);
    }

    #[test]
    fn test_phenomenon_labels() {
        assert_eq!(
            phenomenon("-RA", Intensity::Light, None, &["RA"]).label(),
            "light rain"
        );
        assert_eq!(
            phenomenon("TSRA", Intensity::Moderate, Some("TS"), &["RA"]).label(),
            "thunderstorm rain"
        );
        assert_eq!(
            phenomenon("+SHRA", Intensity::Heavy, Some("SH"), &["RA"]).label(),
            "heavy shower rain"
        );
        assert_eq!(phenomenon("DZ", Intensity::Moderate, None, &["DZ"]).label(), "drizzle");
    }

    #[test]
    fn test_to_row_pads_cloud_slots() {
        let mut report = DecodedReport::unknown("STN1 SCT020");
        report.cloud_layers.push(CloudLayer::new(Coverage::Scattered, Some(2000)));

        let row = report.to_row();
        assert_eq!(row.cloud_layers[0].coverage, Some(Coverage::Scattered));
        assert_eq!(row.cloud_layers[0].height_ft, Some(2000));
        assert_eq!(row.cloud_layers[1], CloudSlot::default());
        assert_eq!(row.cloud_layers[2], CloudSlot::default());
        assert!(!row.is_rain);
        assert_eq!(row.rain_type, "");
    }

    #[test]
    fn test_row_json_uses_null_for_unknown() {
        let json = DecodedReport::unknown("garbage").to_row().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["report_time"].is_null());
        assert!(value["temperature"].is_null());
        assert!(value["cloud_layers"][0]["coverage"].is_null());
        assert_eq!(value["raw_text"], "garbage");
        assert_eq!(value["is_rain"], false);
    }

    #[test]
    fn test_row_json_uses_plain_wind_and_visibility() {
        let mut report = DecodedReport::unknown("VVCS 03005KT 6000");
        report.wind = Some(Wind {
            direction: WindDirection::Degrees(30),
            speed_kt: 5,
            gust_kt: None,
            variation: None,
        });
        report.visibility = Some(Visibility::Distance(6000));

        let value: serde_json::Value =
            serde_json::from_str(&report.to_row().to_json().unwrap()).unwrap();
        assert_eq!(value["wind_direction"], 30);
        assert_eq!(value["visibility"], 6000);

        report.wind = report.wind.map(|wind| Wind {
            direction: WindDirection::Variable,
            ..wind
        });
        report.visibility = Some(Visibility::Unlimited);

        let value: serde_json::Value =
            serde_json::from_str(&report.to_row().to_json().unwrap()).unwrap();
        assert_eq!(value["wind_direction"], "VRB");
        assert_eq!(value["visibility"], "CAVOK");
    }

    #[test]
    fn test_plain_values_deserialize() {
        assert_eq!(
            serde_json::from_str::<WindDirection>("30").unwrap(),
            WindDirection::Degrees(30)
        );
        assert_eq!(
            serde_json::from_str::<WindDirection>("\"VRB\"").unwrap(),
            WindDirection::Variable
        );
        assert_eq!(
            serde_json::from_str::<Visibility>("\"CAVOK\"").unwrap(),
            Visibility::Unlimited
        );
        assert!(serde_json::from_str::<WindDirection>("370").is_err());
        assert!(serde_json::from_str::<Visibility>("\"far\"").is_err());
    }

    mod forecast_tests {
        use super::*;

        #[test]
        fn test_forecast_validation() {
            let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
            let forecast = Forecast::new(date, "030/05", 25.0, 28.0, "scattered showers").unwrap();
            assert_eq!(forecast.mean_temperature(), 26.5);

            let err = Forecast::new(date, "", 28.0, 25.0, "").unwrap_err();
            assert!(matches!(err, Error::Validation { .. }));

            assert!(Forecast::new(date, "", f64::NAN, 25.0, "").is_err());
        }
    }

    mod rain_event_tests {
        use super::*;

        #[test]
        fn test_rain_level_parse() {
            assert_eq!("drizzle".parse::<RainLevel>().unwrap(), RainLevel::Drizzle);
            assert_eq!(
                "Thunder-Shower".parse::<RainLevel>().unwrap(),
                RainLevel::ThunderShower
            );
            assert!("monsoon".parse::<RainLevel>().is_err());
        }

        #[test]
        fn test_parse_time() {
            let time = RainEvent::parse_time("2024-07-01 12:06").unwrap();
            assert_eq!(time.format("%Y-%m-%d %H:%M").to_string(), "2024-07-01 12:06");

            let err = RainEvent::parse_time("2024-07-01 25:06").unwrap_err();
            assert!(matches!(err, Error::InvalidTimestamp { .. }));
            assert!(RainEvent::parse_time("12:06").is_err());
        }

        #[test]
        fn test_time_from_parts() {
            let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
            let time = RainEvent::time_from_parts(date, "09:30").unwrap();
            assert_eq!(time, date.and_hms_opt(9, 30, 0).unwrap());
            assert!(RainEvent::time_from_parts(date, "9h30").is_err());
        }

        #[test]
        fn test_new_truncates_seconds() {
            let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
            let event = RainEvent::new(date.and_hms_opt(9, 30, 45).unwrap(), RainLevel::Light, " -RA ", "");
            assert_eq!(event.time, date.and_hms_opt(9, 30, 0).unwrap());
            assert_eq!(event.code, "-RA");
        }
    }
}
