//! SQLite-backed observation store
//!
//! Append-only storage for decoded reports, forecasts and rain events, with
//! date-range queries and the per-day rain event count.
//!
//! ## Architecture
//!
//! - [`schema`] - Table definitions and the version-tracked migration
//! - [`convert`] - Row mapping between domain records and SQLite values
//!
//! The connection is held behind a [`Mutex`], so a [`Store`] is `Send + Sync`
//! and can be shared through an `Arc`. Every insert runs in its own
//! transaction: a concurrent range query sees all of a record or none of it.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use station_wx::{DecodeContext, Decoder, Store};
//!
//! let store = Store::open_in_memory().unwrap();
//! let date = NaiveDate::from_ymd_opt(2024, 7, 12).unwrap();
//! let report = Decoder::new().decode("VVCS 121230Z 03005KT 9999 -RA 27/24", &DecodeContext::new(date));
//!
//! store.insert_report(&report).unwrap();
//! let rows = store.reports_between(date, date).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert!(rows[0].is_rain);
//! ```

pub mod convert;
pub mod schema;

#[cfg(test)]
pub mod tests;

use crate::app::models::{DailyRainCount, DecodedReport, Forecast, RainEvent, ReportRow};
use crate::{Error, Result};
use chrono::NaiveDate;
use convert::{StoredForecast, StoredRainEvent, StoredReport};
use rusqlite::{Connection, params};
use schema::REPORT_COLUMNS;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Observation store over one SQLite database
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (creating if needed) the database at `path` and migrate it
    ///
    /// # Arguments
    ///
    /// * `path` - Database file; missing parent directories are created
    ///
    /// # Returns
    ///
    /// Result containing the ready store or an error
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::io(
                    format!("Failed to create database directory {}", parent.display()),
                    e,
                )
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            Error::storage(format!("failed to open database {}", path.display()), e)
        })?;
        info!("Opened observation database {}", path.display());

        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::storage("failed to open in-memory database", e))?;
        Self::with_connection(conn, None)
    }

    fn with_connection(mut conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        schema::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file path; `None` for an in-memory store
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // A panic mid-call cannot leave a half-written record: the open
    // transaction is rolled back when it is dropped.
    fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Store a decoded report; returns its row id
    pub fn insert_report(&self, report: &DecodedReport) -> Result<i64> {
        let row = report.to_row();

        let mut conn = self.connection();
        let tx = conn
            .transaction()
            .map_err(|e| Error::storage("failed to begin transaction", e))?;
        let id = convert::insert_report(&tx, &row)?;
        tx.commit()
            .map_err(|e| Error::storage("failed to commit report", e))?;

        info!(
            "Stored report {} for {} at {}",
            id,
            row.station_id.as_deref().unwrap_or("-"),
            row.report_time
                .map(|t| t.to_string())
                .unwrap_or_else(|| "unknown time".to_string())
        );
        Ok(id)
    }

    /// Reports whose time falls on a date in `from..=to`, oldest first
    ///
    /// Reports without a resolved time are never in a date range.
    pub fn reports_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<ReportRow>> {
        let (start, end) = day_bounds(from, to)?;
        let conn = self.connection();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM metar_reports
                 WHERE report_time >= ?1 AND report_time < ?2
                 ORDER BY report_time, id",
                REPORT_COLUMNS
            ))
            .map_err(|e| Error::storage("failed to prepare report query", e))?;

        let stored = stmt
            .query_map(
                params![
                    format!("{} 00:00:00", convert::format_date(&start)),
                    format!("{} 00:00:00", convert::format_date(&end)),
                ],
                StoredReport::from_row,
            )
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::storage("failed to query reports", e))?;

        debug!("Loaded {} reports between {} and {}", stored.len(), from, to);
        stored.into_iter().map(StoredReport::into_report_row).collect()
    }

    /// The most recently stored reports, newest first
    pub fn recent_reports(&self, limit: usize) -> Result<Vec<ReportRow>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let conn = self.connection();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM metar_reports ORDER BY id DESC LIMIT ?1",
                REPORT_COLUMNS
            ))
            .map_err(|e| Error::storage("failed to prepare report query", e))?;

        let stored = stmt
            .query_map(params![limit], StoredReport::from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::storage("failed to query recent reports", e))?;

        stored.into_iter().map(StoredReport::into_report_row).collect()
    }

    // =========================================================================
    // Forecasts
    // =========================================================================

    /// Store a forecast after validating it; returns its row id
    pub fn insert_forecast(&self, forecast: &Forecast) -> Result<i64> {
        forecast.validate()?;

        let mut conn = self.connection();
        let tx = conn
            .transaction()
            .map_err(|e| Error::storage("failed to begin transaction", e))?;
        let id = convert::insert_forecast(&tx, forecast)?;
        tx.commit()
            .map_err(|e| Error::storage("failed to commit forecast", e))?;

        info!("Stored forecast {} for {}", id, forecast.date);
        Ok(id)
    }

    /// Forecasts dated within `from..=to`, by date
    pub fn forecasts_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Forecast>> {
        check_range(from, to)?;
        let conn = self.connection();
        let mut stmt = conn
            .prepare(
                "SELECT date, wind, temp_min, temp_max, weather FROM forecasts
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY date, id",
            )
            .map_err(|e| Error::storage("failed to prepare forecast query", e))?;

        let stored = stmt
            .query_map(
                params![convert::format_date(&from), convert::format_date(&to)],
                StoredForecast::from_row,
            )
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::storage("failed to query forecasts", e))?;

        stored.into_iter().map(StoredForecast::into_forecast).collect()
    }

    // =========================================================================
    // Rain Events
    // =========================================================================

    /// Store a rain event; returns its row id
    pub fn insert_rain_event(&self, event: &RainEvent) -> Result<i64> {
        let mut conn = self.connection();
        let tx = conn
            .transaction()
            .map_err(|e| Error::storage("failed to begin transaction", e))?;
        let id = convert::insert_rain_event(&tx, event)?;
        tx.commit()
            .map_err(|e| Error::storage("failed to commit rain event", e))?;

        info!(
            "Stored rain event {}: {} at {}",
            id,
            event.level,
            convert::format_event_time(&event.time)
        );
        Ok(id)
    }

    /// Rain events on a date in `from..=to`, oldest first
    ///
    /// The whole of the `to` day is included.
    pub fn rain_events_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<RainEvent>> {
        let (start, end) = day_bounds(from, to)?;
        let conn = self.connection();
        let mut stmt = conn
            .prepare(
                "SELECT event_time, level, code, note FROM rain_events
                 WHERE event_time >= ?1 AND event_time < ?2
                 ORDER BY event_time, id",
            )
            .map_err(|e| Error::storage("failed to prepare rain event query", e))?;

        let stored = stmt
            .query_map(
                params![
                    format!("{} 00:00", convert::format_date(&start)),
                    format!("{} 00:00", convert::format_date(&end)),
                ],
                StoredRainEvent::from_row,
            )
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::storage("failed to query rain events", e))?;

        stored.into_iter().map(StoredRainEvent::into_event).collect()
    }

    /// Number of rain events per calendar day in `from..=to`
    ///
    /// Days without events are absent from the result.
    pub fn rain_counts_by_day(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyRainCount>> {
        let (start, end) = day_bounds(from, to)?;
        let conn = self.connection();
        let mut stmt = conn
            .prepare(
                "SELECT substr(event_time, 1, 10) AS day, COUNT(*) FROM rain_events
                 WHERE event_time >= ?1 AND event_time < ?2
                 GROUP BY day
                 ORDER BY day",
            )
            .map_err(|e| Error::storage("failed to prepare rain count query", e))?;

        let counts = stmt
            .query_map(
                params![
                    format!("{} 00:00", convert::format_date(&start)),
                    format!("{} 00:00", convert::format_date(&end)),
                ],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::storage("failed to count rain events", e))?;

        counts
            .into_iter()
            .map(|(day, count)| {
                Ok(DailyRainCount {
                    date: convert::parse_count_date(&day)?,
                    count: u32::try_from(count).map_err(|_| {
                        Error::corrupt_record(
                            convert::RAIN_EVENTS_TABLE,
                            format!("event count {} is out of range", count),
                        )
                    })?,
                })
            })
            .collect()
    }
}

fn check_range(from: NaiveDate, to: NaiveDate) -> Result<()> {
    if from > to {
        return Err(Error::usage(format!(
            "Date range start {} is after its end {}",
            from, to
        )));
    }
    Ok(())
}

/// Half-open day bounds `[from, to + 1 day)` for an inclusive date range
fn day_bounds(from: NaiveDate, to: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    check_range(from, to)?;
    let end = to
        .succ_opt()
        .ok_or_else(|| Error::usage(format!("Date range end {} is out of range", to)))?;
    Ok((from, end))
}
