//! Field extractors for report groups
//!
//! Each extractor is a pure function from one group to `Some(value)` when the
//! group matches its grammar, or `None` otherwise. [`classify_group`] tries them
//! in a fixed priority order (fixed-shape groups first, cloud and present weather
//! last) so that a group is claimed by at most one extractor.
//!
//! [`malformed_field`] recognizes groups that are *shaped* like a known grammar
//! but fail it, e.g. a wind group with no unit. Those leave the field unknown.

use crate::app::models::{
    CloudLayer, Coverage, Intensity, Phenomenon, Visibility, Wind, WindDirection, WindVariation,
};
use crate::constants::{
    CAVOK_MARKER, CLOUD_HEIGHT_MULTIPLIER_FT, MAX_WIND_DIRECTION, METRES_PER_STATUTE_MILE,
    WEATHER_DESCRIPTORS, WEATHER_TYPES, wind_units,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Report fields a group can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Time,
    Wind,
    WindVariation,
    Visibility,
    Temperature,
    Cloud,
    Weather,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Time => "time",
            Self::Wind => "wind",
            Self::WindVariation => "wind variation",
            Self::Visibility => "visibility",
            Self::Temperature => "temperature",
            Self::Cloud => "cloud",
            Self::Weather => "weather",
        };
        f.write_str(name)
    }
}

/// A group recognized by one of the extractors
#[derive(Debug, Clone, PartialEq)]
pub enum Group {
    Wind(Wind),
    WindVariation(WindVariation),
    Visibility(Visibility),
    Temperature {
        temperature: Option<i16>,
        dewpoint: Option<i16>,
    },
    Cloud(CloudLayer),
    Weather(Phenomenon),
}

impl Group {
    pub fn field(&self) -> FieldKind {
        match self {
            Self::Wind(_) => FieldKind::Wind,
            Self::WindVariation(_) => FieldKind::WindVariation,
            Self::Visibility(_) => FieldKind::Visibility,
            Self::Temperature { .. } => FieldKind::Temperature,
            Self::Cloud(_) => FieldKind::Cloud,
            Self::Weather(_) => FieldKind::Weather,
        }
    }
}

/// Day of month, hour and minute from a `DDHHMMZ` group, not yet range-checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGroup {
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Regex patterns for report groups.
static PATTERNS: LazyLock<GroupPatterns> = LazyLock::new(GroupPatterns::new);

struct GroupPatterns {
    time: Regex,

    // Strict grammars
    wind: Regex,
    wind_variation: Regex,
    visibility_metres: Regex,
    visibility_miles: Regex,
    visibility_whole_miles: Regex,
    temperature: Regex,
    cloud: Regex,
    weather: Regex,

    // Loose shapes, used only to tell malformed groups from foreign ones
    wind_shaped: Regex,
    temperature_shaped: Regex,
    cloud_shaped: Regex,
}

impl GroupPatterns {
    fn new() -> Self {
        let descriptors: Vec<&str> = WEATHER_DESCRIPTORS.iter().map(|(code, _)| *code).collect();
        let types: Vec<&str> = WEATHER_TYPES.iter().map(|(code, _)| *code).collect();

        Self {
            // 121230Z
            time: Regex::new(r"^(\d{2})(\d{2})(\d{2})Z$").expect("static regex must compile"),

            // 03005G12KT, VRB02KT, 27015MPS
            wind: Regex::new(r"^(\d{3}|VRB)(\d{2,3})(?:G(\d{2,3}))?(KT|MPS|KMH)$")
                .expect("static regex must compile"),
            // 180V240
            wind_variation: Regex::new(r"^(\d{3})V(\d{3})$").expect("static regex must compile"),
            // 6000, 9999
            visibility_metres: Regex::new(r"^(\d{4})$").expect("static regex must compile"),
            // 10SM, 1/2SM, M1/4SM, P6SM
            visibility_miles: Regex::new(r"^([MP])?(?:(\d{1,2})|(\d)/(\d{1,2}))SM$")
                .expect("static regex must compile"),
            // whole-mile part of a mixed number such as "1 1/2SM"
            visibility_whole_miles: Regex::new(r"^([1-9])$").expect("static regex must compile"),
            // 18/15, M02/M05, 18///, 18/
            temperature: Regex::new(r"^(M?\d{2}|//)/(M?\d{2}|//)?$")
                .expect("static regex must compile"),
            // BKN012, OVC///, SCT025CB, VV003
            cloud: Regex::new(r"^(FEW|SCT|BKN|OVC|VV)(\d{3}|///)(?:CB|TCU|///)?$")
                .expect("static regex must compile"),
            // -RA, +TSRA, VCSH, SHRASN, BR
            weather: Regex::new(&format!(
                r"^(-|\+|VC)?({})?((?:{}){{0,3}})$",
                descriptors.join("|"),
                types.join("|")
            ))
            .expect("static regex must compile"),

            wind_shaped: Regex::new(r"^(\d{3}|VRB)\d{2,3}(?:G\d{0,3})?[A-Z]*$")
                .expect("static regex must compile"),
            temperature_shaped: Regex::new(r"^M?\d{1,3}/\S*$").expect("static regex must compile"),
            cloud_shaped: Regex::new(r"^(FEW|SCT|BKN|OVC|VV)\S*$")
                .expect("static regex must compile"),
        }
    }
}

/// Classify a group, trying extractors in priority order
///
/// Wind, wind variation, visibility and temperature are fixed-shape groups
/// and are tried first; cloud and present weather are tried last.
pub fn classify_group(token: &str) -> Option<Group> {
    if let Some(wind) = extract_wind(token) {
        return Some(Group::Wind(wind));
    }
    if let Some(variation) = extract_wind_variation(token) {
        return Some(Group::WindVariation(variation));
    }
    if let Some(visibility) = extract_visibility(token) {
        return Some(Group::Visibility(visibility));
    }
    if let Some((temperature, dewpoint)) = extract_temperature(token) {
        return Some(Group::Temperature {
            temperature,
            dewpoint,
        });
    }
    if let Some(layer) = extract_cloud(token) {
        return Some(Group::Cloud(layer));
    }
    extract_weather(token).map(Group::Weather)
}

/// Identify a group that resembles a known grammar but does not satisfy it
pub fn malformed_field(token: &str) -> Option<FieldKind> {
    let patterns = &*PATTERNS;
    if patterns.wind_shaped.is_match(token) {
        Some(FieldKind::Wind)
    } else if patterns.temperature_shaped.is_match(token) {
        Some(FieldKind::Temperature)
    } else if patterns.cloud_shaped.is_match(token) {
        Some(FieldKind::Cloud)
    } else {
        None
    }
}

/// Extract the day/hour/minute of a `DDHHMMZ` group
pub fn extract_time_group(token: &str) -> Option<TimeGroup> {
    let caps = PATTERNS.time.captures(token)?;
    Some(TimeGroup {
        day: caps[1].parse().ok()?,
        hour: caps[2].parse().ok()?,
        minute: caps[3].parse().ok()?,
    })
}

/// Extract a wind group, normalizing speeds to knots
///
/// A direction above 360 degrees does not match.
pub fn extract_wind(token: &str) -> Option<Wind> {
    let caps = PATTERNS.wind.captures(token)?;

    let direction = match &caps[1] {
        "VRB" => WindDirection::Variable,
        digits => {
            let degrees: u16 = digits.parse().ok()?;
            if degrees > MAX_WIND_DIRECTION {
                return None;
            }
            WindDirection::Degrees(degrees)
        }
    };

    let factor = match &caps[4] {
        wind_units::KNOTS => wind_units::KNOTS_FACTOR,
        wind_units::METRES_PER_SECOND => wind_units::METRES_PER_SECOND_FACTOR,
        wind_units::KILOMETRES_PER_HOUR => wind_units::KILOMETRES_PER_HOUR_FACTOR,
        _ => return None,
    };

    let speed_kt = to_knots(&caps[2], factor)?;
    let gust_kt = match caps.get(3) {
        Some(gust) => Some(to_knots(gust.as_str(), factor)?),
        None => None,
    };

    Some(Wind {
        direction,
        speed_kt,
        gust_kt,
        variation: None,
    })
}

fn to_knots(digits: &str, factor: f64) -> Option<u16> {
    let raw: u32 = digits.parse().ok()?;
    u16::try_from((f64::from(raw) * factor).round() as u32).ok()
}

/// Extract a `DDDVDDD` wind direction variation group
pub fn extract_wind_variation(token: &str) -> Option<WindVariation> {
    let caps = PATTERNS.wind_variation.captures(token)?;
    let from_deg: u16 = caps[1].parse().ok()?;
    let to_deg: u16 = caps[2].parse().ok()?;

    if from_deg > MAX_WIND_DIRECTION || to_deg > MAX_WIND_DIRECTION {
        return None;
    }

    Some(WindVariation { from_deg, to_deg })
}

/// Extract a visibility group: metres, statute miles, or CAVOK
pub fn extract_visibility(token: &str) -> Option<Visibility> {
    if token == CAVOK_MARKER {
        return Some(Visibility::Unlimited);
    }

    if let Some(caps) = PATTERNS.visibility_metres.captures(token) {
        return caps[1].parse().ok().map(Visibility::Distance);
    }

    let caps = PATTERNS.visibility_miles.captures(token)?;
    let miles = match (caps.get(2), caps.get(3), caps.get(4)) {
        (Some(whole), _, _) => whole.as_str().parse::<f64>().ok()?,
        (None, Some(numerator), Some(denominator)) => {
            fraction(numerator.as_str(), denominator.as_str())?
        }
        _ => return None,
    };

    Some(miles_to_visibility(miles))
}

/// Extract a two-group mixed-number visibility such as `1 1/2SM`
pub fn extract_mixed_visibility(whole: &str, fraction_group: &str) -> Option<Visibility> {
    let whole_caps = PATTERNS.visibility_whole_miles.captures(whole)?;
    let caps = PATTERNS.visibility_miles.captures(fraction_group)?;

    // Only a plain fraction can follow the whole-mile part
    if caps.get(1).is_some() || caps.get(2).is_some() {
        return None;
    }

    let whole_miles: f64 = whole_caps[1].parse().ok()?;
    let part = fraction(caps.get(3)?.as_str(), caps.get(4)?.as_str())?;
    Some(miles_to_visibility(whole_miles + part))
}

fn fraction(numerator: &str, denominator: &str) -> Option<f64> {
    let numerator: f64 = numerator.parse().ok()?;
    let denominator: f64 = denominator.parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

fn miles_to_visibility(miles: f64) -> Visibility {
    Visibility::Distance((miles * METRES_PER_STATUTE_MILE).round() as u32)
}

/// Extract a temperature/dewpoint group
///
/// `M` marks a negative value. Either half may be missing (`//` or empty),
/// leaving that value unknown.
pub fn extract_temperature(token: &str) -> Option<(Option<i16>, Option<i16>)> {
    let caps = PATTERNS.temperature.captures(token)?;
    let temperature = parse_signed_degrees(&caps[1]);
    let dewpoint = caps.get(2).and_then(|m| parse_signed_degrees(m.as_str()));
    Some((temperature, dewpoint))
}

fn parse_signed_degrees(value: &str) -> Option<i16> {
    match value.strip_prefix('M') {
        Some(digits) => digits.parse::<i16>().ok().map(|v| -v),
        None => value.parse::<i16>().ok(),
    }
}

/// Extract a cloud layer group, or the synthetic clear layer for "no cloud" codes
pub fn extract_cloud(token: &str) -> Option<CloudLayer> {
    if Coverage::is_clear_code(token) {
        return Some(CloudLayer::clear());
    }

    let caps = PATTERNS.cloud.captures(token)?;
    let coverage = Coverage::from_layer_code(&caps[1])?;
    let height_ft = caps[2]
        .parse::<u32>()
        .ok()
        .map(|hundreds| hundreds * CLOUD_HEIGHT_MULTIPLIER_FT);

    Some(CloudLayer::new(coverage, height_ft))
}

/// Extract a present-weather group
///
/// A group needs at least one type code, or a thunderstorm/shower descriptor
/// on its own (e.g. `TS`, `VCSH`).
pub fn extract_weather(token: &str) -> Option<Phenomenon> {
    let caps = PATTERNS.weather.captures(token)?;

    let descriptor = caps.get(2).map(|m| m.as_str().to_string());
    let type_codes = caps.get(3).map(|m| m.as_str()).unwrap_or("");
    let types: Vec<String> = type_codes
        .as_bytes()
        .chunks(2)
        .filter_map(|pair| std::str::from_utf8(pair).ok())
        .map(str::to_string)
        .collect();

    let standalone_descriptor = matches!(descriptor.as_deref(), Some("TS") | Some("SH"));
    if types.is_empty() && !standalone_descriptor {
        return None;
    }

    Some(Phenomenon {
        code: token.to_string(),
        intensity: Intensity::from_prefix(caps.get(1).map(|m| m.as_str()).unwrap_or("")),
        descriptor,
        types,
    })
}
