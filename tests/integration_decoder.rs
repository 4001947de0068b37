//! Integration tests for report decoding through the public API
//!
//! These tests decode realistic reports with the crate-level `decode`
//! function and check the flattened output rows a caller would display.

use chrono::{NaiveDate, NaiveDateTime};
use station_wx::app::models::Coverage;
use station_wx::{DecodeContext, Decoder, Error, ReportRow, Visibility, WindDirection, decode};

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 12).unwrap()
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn row(raw: &str) -> ReportRow {
    decode(raw, reference_date(), Some("VVCS")).unwrap().to_row()
}

/// Test the complete output row of a routine report
///
/// Purpose: Validate every column of the output schema for a clean report
/// Benefit: Catches regressions in field extraction and row flattening together
#[test]
fn test_reference_report_row() {
    let row = row("STN1 121230Z 03005G12KT 6000 -RA BKN012 OVC025 18/15");

    assert_eq!(row.report_time, Some(at(12, 12, 30)));
    assert_eq!(row.station_id.as_deref(), Some("STN1"));
    assert_eq!(row.wind_direction, Some(WindDirection::Degrees(30)));
    assert_eq!(row.wind_speed_kt, Some(5));
    assert_eq!(row.wind_gust_kt, Some(12));
    assert_eq!(row.visibility, Some(Visibility::Distance(6000)));
    assert_eq!(row.temperature, Some(18));
    assert_eq!(row.dewpoint, Some(15));
    assert_eq!(row.weather_phenomena, "-RA");
    assert!(row.is_rain);
    assert_eq!(row.rain_type, "light rain");
    assert_eq!(row.cloud_layers[0].coverage, Some(Coverage::Broken));
    assert_eq!(row.cloud_layers[0].height_ft, Some(1200));
    assert_eq!(row.cloud_layers[1].coverage, Some(Coverage::Overcast));
    assert_eq!(row.cloud_layers[1].height_ft, Some(2500));
    assert_eq!(row.cloud_layers[2].coverage, None);
}

/// Test CAVOK reports
///
/// Purpose: Ensure CAVOK gives unlimited visibility and no cloud layers
/// Benefit: CAVOK is the most common fair-weather report at the station
#[test]
fn test_cavok_report_row() {
    let row = row("METAR VVCS 121200Z 36010KT CAVOK 31/24 NOSIG");

    assert_eq!(row.visibility, Some(Visibility::Unlimited));
    assert!(row.cloud_layers.iter().all(|slot| slot.coverage.is_none()));
    assert!(!row.is_rain);
    assert_eq!(row.rain_type, "");
}

/// Test that a malformed group only affects its own field
///
/// Purpose: Validate partial decoding of a report with a broken wind group
/// Benefit: Real feeds contain typos; the rest of the report must survive
#[test]
fn test_malformed_wind_leaves_other_fields() {
    let decoding = Decoder::new().decode_with_diagnostics(
        "STN1 121230Z 03005G12 6000 18/15",
        &DecodeContext::new(reference_date()),
    );

    let row = decoding.report.to_row();
    assert_eq!(row.wind_direction, None);
    assert_eq!(row.wind_speed_kt, None);
    assert_eq!(row.visibility, Some(Visibility::Distance(6000)));
    assert_eq!(row.temperature, Some(18));
    assert_eq!(decoding.diagnostics.len(), 1);
    assert_eq!(decoding.diagnostics[0].token, "03005G12");
}

/// Test station hint fallback
///
/// Purpose: A report without an identifier takes the caller's station
/// Benefit: Manually typed reports often omit the station
#[test]
fn test_station_hint_applies_only_when_missing() {
    assert_eq!(
        row("121230Z 03005KT 9999 FEW020 31/25").station_id.as_deref(),
        Some("VVCS")
    );
    assert_eq!(
        row("KJFK 121230Z 03005KT 9999").station_id.as_deref(),
        Some("KJFK")
    );
}

/// Test report time resolution across a month boundary
///
/// Purpose: A day-of-month after the reference day belongs to the previous month
/// Benefit: Reports imported on the 1st for the end of last month keep their dates
#[test]
fn test_report_day_in_previous_month() {
    let report = decode(
        "VVCS 302330Z 00000KT 9999 SCT020 27/25",
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        None,
    )
    .unwrap();

    assert_eq!(
        report.report_time,
        NaiveDate::from_ymd_opt(2024, 6, 30)
            .unwrap()
            .and_hms_opt(23, 30, 0)
    );
    assert!(report.wind.unwrap().is_calm());
}

/// Test that an invalid station hint is the only decode error
///
/// Purpose: Separate caller mistakes from report content problems
/// Benefit: Garbage report text never fails, a bad hint always does
#[test]
fn test_invalid_station_hint_is_usage_error() {
    let err = decode("VVCS 121230Z", reference_date(), Some("TOO-LONG")).unwrap_err();
    assert!(matches!(err, Error::Usage { .. }));

    let garbage = decode("%%% ??? 12", reference_date(), None).unwrap();
    assert_eq!(garbage.report_time, None);
    assert_eq!(garbage.raw_text, "%%% ??? 12");
}
