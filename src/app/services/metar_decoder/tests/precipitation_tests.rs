//! Tests for rain indicator and rain type classification

use super::super::extractors::extract_weather;
use super::super::precipitation::{Precipitation, classify};
use crate::app::models::Phenomenon;

fn phenomena(codes: &[&str]) -> Vec<Phenomenon> {
    codes
        .iter()
        .map(|code| extract_weather(code).unwrap())
        .collect()
}

#[test]
fn test_no_weather_is_not_rain() {
    assert_eq!(classify(&[]), Precipitation::default());
}

#[test]
fn test_light_rain() {
    let result = classify(&phenomena(&["-RA"]));
    assert!(result.is_rain);
    assert_eq!(result.rain_type, "light rain");
}

#[test]
fn test_rain_variants_count_as_rain() {
    for (code, label) in [
        ("SHRA", "shower rain"),
        ("+TSRA", "heavy thunderstorm rain"),
        ("FZDZ", "freezing drizzle"),
        ("-DZ", "light drizzle"),
        ("VCSHRA", "vicinity shower rain"),
        ("RASN", "rain snow"),
    ] {
        let result = classify(&phenomena(&[code]));
        assert!(result.is_rain, "{} should be rain", code);
        assert_eq!(result.rain_type, label, "{}", code);
    }
}

#[test]
fn test_non_liquid_weather_is_not_rain() {
    for code in ["BR", "FG", "SN", "TS", "VCSH", "HZ"] {
        let result = classify(&phenomena(&[code]));
        assert!(!result.is_rain, "{} should not be rain", code);
        assert!(result.rain_type.is_empty());
    }
}

#[test]
fn test_first_liquid_group_names_the_rain_type() {
    let result = classify(&phenomena(&["BR", "TS", "-DZ", "+SHRA"]));
    assert!(result.is_rain);
    assert_eq!(result.rain_type, "light drizzle");
}
