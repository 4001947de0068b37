//! Conversion between domain records and SQLite rows
//!
//! Rows are first read into plain `Stored*` structs holding SQLite-native
//! values, then converted into domain types. Any value that does not parse
//! back (bad timestamp, unknown enum text, out-of-range integer) is reported
//! as [`Error::CorruptRecord`] instead of being silently replaced.

use crate::app::models::{
    CloudSlot, Coverage, Forecast, RainEvent, RainLevel, ReportKind, ReportRow, Visibility,
    WindDirection,
};
use crate::constants::{DATE_FORMAT, EVENT_TIME_FORMAT, MAX_CLOUD_LAYERS, REPORT_TIME_FORMAT};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Row, Transaction, params};
use std::str::FromStr;

pub(crate) const REPORTS_TABLE: &str = "metar_reports";
pub(crate) const FORECASTS_TABLE: &str = "forecasts";
pub(crate) const RAIN_EVENTS_TABLE: &str = "rain_events";

// =============================================================================
// Value Formatting
// =============================================================================

pub(crate) fn format_report_time(time: &NaiveDateTime) -> String {
    time.format(REPORT_TIME_FORMAT).to_string()
}

pub(crate) fn format_event_time(time: &NaiveDateTime) -> String {
    time.format(EVENT_TIME_FORMAT).to_string()
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_stored<T: FromStr>(table: &str, column: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        Error::corrupt_record(table, format!("invalid {} value '{}'", column, value))
    })
}

fn parse_stored_time(table: &str, column: &str, value: &str, format: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format).map_err(|_| {
        Error::corrupt_record(table, format!("invalid {} value '{}'", column, value))
    })
}

fn narrow<T: TryFrom<i64>>(table: &str, column: &str, value: Option<i64>) -> Result<Option<T>> {
    value
        .map(|v| {
            T::try_from(v).map_err(|_| {
                Error::corrupt_record(table, format!("{} value {} is out of range", column, v))
            })
        })
        .transpose()
}

// =============================================================================
// Reports
// =============================================================================

/// Insert one report row; returns the new row id
pub(crate) fn insert_report(tx: &Transaction<'_>, row: &ReportRow) -> Result<i64> {
    let [c1, c2, c3] = &row.cloud_layers;
    tx.execute(
        "INSERT INTO metar_reports (
            report_time, station_id, raw_text,
            wind_direction, wind_speed_kt, wind_gust_kt, visibility, temperature, dewpoint,
            weather_phenomena, is_rain, rain_type,
            cloud_1_coverage, cloud_1_height_ft, cloud_2_coverage, cloud_2_height_ft,
            cloud_3_coverage, cloud_3_height_ft, kind
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        params![
            row.report_time.as_ref().map(format_report_time),
            row.station_id,
            row.raw_text,
            row.wind_direction.map(|d| d.to_string()),
            row.wind_speed_kt,
            row.wind_gust_kt,
            row.visibility.map(|v| v.to_string()),
            row.temperature,
            row.dewpoint,
            row.weather_phenomena,
            row.is_rain,
            row.rain_type,
            c1.coverage.map(Coverage::code),
            c1.height_ft,
            c2.coverage.map(Coverage::code),
            c2.height_ft,
            c3.coverage.map(Coverage::code),
            c3.height_ft,
            row.kind.as_str(),
        ],
    )
    .map_err(|e| Error::storage("failed to insert report", e))?;

    Ok(tx.last_insert_rowid())
}

/// A report row as stored, before conversion
pub(crate) struct StoredReport {
    report_time: Option<String>,
    station_id: Option<String>,
    raw_text: String,
    wind_direction: Option<String>,
    wind_speed_kt: Option<i64>,
    wind_gust_kt: Option<i64>,
    visibility: Option<String>,
    temperature: Option<i64>,
    dewpoint: Option<i64>,
    weather_phenomena: String,
    is_rain: bool,
    rain_type: String,
    clouds: [(Option<String>, Option<i64>); MAX_CLOUD_LAYERS],
    kind: String,
}

impl StoredReport {
    /// Read a row selected with [`REPORT_COLUMNS`](super::schema::REPORT_COLUMNS)
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            report_time: row.get(0)?,
            station_id: row.get(1)?,
            raw_text: row.get(2)?,
            wind_direction: row.get(3)?,
            wind_speed_kt: row.get(4)?,
            wind_gust_kt: row.get(5)?,
            visibility: row.get(6)?,
            temperature: row.get(7)?,
            dewpoint: row.get(8)?,
            weather_phenomena: row.get(9)?,
            is_rain: row.get(10)?,
            rain_type: row.get(11)?,
            clouds: [
                (row.get(12)?, row.get(13)?),
                (row.get(14)?, row.get(15)?),
                (row.get(16)?, row.get(17)?),
            ],
            kind: row.get(18)?,
        })
    }

    pub(crate) fn into_report_row(self) -> Result<ReportRow> {
        let table = REPORTS_TABLE;

        let report_time = self
            .report_time
            .as_deref()
            .map(|t| parse_stored_time(table, "report_time", t, REPORT_TIME_FORMAT))
            .transpose()?;
        let wind_direction = self
            .wind_direction
            .as_deref()
            .map(|d| parse_stored::<WindDirection>(table, "wind_direction", d))
            .transpose()?;
        let visibility = self
            .visibility
            .as_deref()
            .map(|v| parse_stored::<Visibility>(table, "visibility", v))
            .transpose()?;

        let mut cloud_layers = [CloudSlot::default(); MAX_CLOUD_LAYERS];
        for (slot, (coverage, height)) in cloud_layers.iter_mut().zip(self.clouds) {
            *slot = CloudSlot {
                coverage: coverage
                    .as_deref()
                    .map(|c| parse_stored::<Coverage>(table, "cloud coverage", c))
                    .transpose()?,
                height_ft: narrow(table, "cloud height", height)?,
            };
        }

        Ok(ReportRow {
            report_time,
            station_id: self.station_id,
            raw_text: self.raw_text,
            wind_direction,
            wind_speed_kt: narrow(table, "wind_speed_kt", self.wind_speed_kt)?,
            wind_gust_kt: narrow(table, "wind_gust_kt", self.wind_gust_kt)?,
            visibility,
            temperature: narrow(table, "temperature", self.temperature)?,
            dewpoint: narrow(table, "dewpoint", self.dewpoint)?,
            weather_phenomena: self.weather_phenomena,
            is_rain: self.is_rain,
            rain_type: self.rain_type,
            cloud_layers,
            kind: parse_stored::<ReportKind>(table, "kind", &self.kind)?,
        })
    }
}

// =============================================================================
// Forecasts
// =============================================================================

pub(crate) fn insert_forecast(tx: &Transaction<'_>, forecast: &Forecast) -> Result<i64> {
    tx.execute(
        "INSERT INTO forecasts (date, wind, temp_min, temp_max, weather)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            format_date(&forecast.date),
            forecast.wind,
            forecast.temp_min,
            forecast.temp_max,
            forecast.weather,
        ],
    )
    .map_err(|e| Error::storage("failed to insert forecast", e))?;

    Ok(tx.last_insert_rowid())
}

pub(crate) struct StoredForecast {
    date: String,
    wind: String,
    temp_min: f64,
    temp_max: f64,
    weather: String,
}

impl StoredForecast {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            wind: row.get(1)?,
            temp_min: row.get(2)?,
            temp_max: row.get(3)?,
            weather: row.get(4)?,
        })
    }

    pub(crate) fn into_forecast(self) -> Result<Forecast> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|_| {
            Error::corrupt_record(
                FORECASTS_TABLE,
                format!("invalid date value '{}'", self.date),
            )
        })?;

        Ok(Forecast {
            date,
            wind: self.wind,
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            weather: self.weather,
        })
    }
}

// =============================================================================
// Rain Events
// =============================================================================

pub(crate) fn insert_rain_event(tx: &Transaction<'_>, event: &RainEvent) -> Result<i64> {
    tx.execute(
        "INSERT INTO rain_events (event_time, level, code, note) VALUES (?1, ?2, ?3, ?4)",
        params![
            format_event_time(&event.time),
            event.level.as_str(),
            event.code,
            event.note,
        ],
    )
    .map_err(|e| Error::storage("failed to insert rain event", e))?;

    Ok(tx.last_insert_rowid())
}

pub(crate) struct StoredRainEvent {
    time: String,
    level: String,
    code: String,
    note: String,
}

impl StoredRainEvent {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            time: row.get(0)?,
            level: row.get(1)?,
            code: row.get(2)?,
            note: row.get(3)?,
        })
    }

    pub(crate) fn into_event(self) -> Result<RainEvent> {
        let table = RAIN_EVENTS_TABLE;
        Ok(RainEvent {
            time: parse_stored_time(table, "event_time", &self.time, EVENT_TIME_FORMAT)?,
            level: parse_stored::<RainLevel>(table, "level", &self.level)?,
            code: self.code,
            note: self.note,
        })
    }
}

pub(crate) fn parse_count_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        Error::corrupt_record(
            RAIN_EVENTS_TABLE,
            format!("invalid event date '{}'", value),
        )
    })
}
