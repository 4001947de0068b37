//! SQL schema for the observation store
//!
//! # Table structure
//!
//! - `metar_reports` - one flattened [`ReportRow`](crate::app::models::ReportRow)
//!   per decoded report, columns in output-schema order
//! - `forecasts` - manually entered daily forecasts
//! - `rain_events` - manually logged precipitation changes
//!
//! Times are stored as text in sortable formats (see [`crate::constants`]),
//! so range filters are plain string comparisons. The schema version is kept
//! in `PRAGMA user_version`.

use crate::{Error, Result};
use rusqlite::Connection;
use tracing::{debug, info};

/// Version written to `PRAGMA user_version` after migration
pub const SCHEMA_VERSION: i64 = 1;

pub(crate) const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS metar_reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_time TEXT,
    station_id TEXT,
    raw_text TEXT NOT NULL,
    wind_direction TEXT,
    wind_speed_kt INTEGER,
    wind_gust_kt INTEGER,
    visibility TEXT,
    temperature INTEGER,
    dewpoint INTEGER,
    weather_phenomena TEXT NOT NULL DEFAULT '',
    is_rain INTEGER NOT NULL DEFAULT 0,
    rain_type TEXT NOT NULL DEFAULT '',
    cloud_1_coverage TEXT,
    cloud_1_height_ft INTEGER,
    cloud_2_coverage TEXT,
    cloud_2_height_ft INTEGER,
    cloud_3_coverage TEXT,
    cloud_3_height_ft INTEGER,
    kind TEXT NOT NULL DEFAULT 'METAR',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_metar_reports_time ON metar_reports(report_time);

CREATE TABLE IF NOT EXISTS forecasts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    wind TEXT NOT NULL DEFAULT '',
    temp_min REAL NOT NULL,
    temp_max REAL NOT NULL,
    weather TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK (temp_max >= temp_min)
);

CREATE INDEX IF NOT EXISTS idx_forecasts_date ON forecasts(date);

CREATE TABLE IF NOT EXISTS rain_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_time TEXT NOT NULL,
    level TEXT NOT NULL,
    code TEXT NOT NULL DEFAULT '',
    note TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_rain_events_time ON rain_events(event_time);
"#;

/// Columns selected for a report row, in [`ReportRow`](crate::app::models::ReportRow) order
pub(crate) const REPORT_COLUMNS: &str = "report_time, station_id, raw_text, \
     wind_direction, wind_speed_kt, wind_gust_kt, visibility, temperature, dewpoint, \
     weather_phenomena, is_rain, rain_type, \
     cloud_1_coverage, cloud_1_height_ft, cloud_2_coverage, cloud_2_height_ft, \
     cloud_3_coverage, cloud_3_height_ft, kind";

/// Create the tables if the database has not been migrated yet
///
/// Runs in one transaction. A database written by a newer version is
/// rejected rather than modified.
pub(crate) fn migrate(conn: &mut Connection) -> Result<()> {
    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| Error::storage("failed to read schema version", e))?;

    if version == SCHEMA_VERSION {
        debug!("Database schema is current (version {})", version);
        return Ok(());
    }

    if version > SCHEMA_VERSION {
        return Err(Error::configuration(format!(
            "Database schema version {} is newer than supported version {}",
            version, SCHEMA_VERSION
        )));
    }

    let tx = conn
        .transaction()
        .map_err(|e| Error::storage("failed to begin migration", e))?;
    tx.execute_batch(SCHEMA_SQL)
        .map_err(|e| Error::storage("failed to create tables", e))?;
    tx.execute_batch(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
        .map_err(|e| Error::storage("failed to record schema version", e))?;
    tx.commit()
        .map_err(|e| Error::storage("failed to commit migration", e))?;

    info!("Migrated database schema to version {}", SCHEMA_VERSION);
    Ok(())
}
