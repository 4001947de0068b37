//! Rain intensity and forecast temperature series
//!
//! Turns stored rain events and forecasts into numeric time series for
//! charting. Rain levels are mapped to numbers through an [`IntensityScale`],
//! a configurable lookup table; the defaults are presentation tuning from the
//! station's original charts, not a physical measure.

use crate::app::models::{Forecast, RainEvent, RainLevel};
use crate::constants::intensity_defaults;
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Numeric chart value for each rain level
///
/// Deserializes from a table keyed by level name; missing levels keep
/// their default value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct IntensityScale {
    pub stopped: f64,
    pub drizzle: f64,
    pub light: f64,
    pub moderate: f64,
    pub heavy: f64,
    pub torrential: f64,
    pub thunder_shower: f64,
}

impl Default for IntensityScale {
    fn default() -> Self {
        Self {
            stopped: intensity_defaults::STOPPED,
            drizzle: intensity_defaults::DRIZZLE,
            light: intensity_defaults::LIGHT,
            moderate: intensity_defaults::MODERATE,
            heavy: intensity_defaults::HEAVY,
            torrential: intensity_defaults::TORRENTIAL,
            thunder_shower: intensity_defaults::THUNDER_SHOWER,
        }
    }
}

impl IntensityScale {
    /// Chart value for a rain level
    pub fn value(&self, level: RainLevel) -> f64 {
        match level {
            RainLevel::Stopped => self.stopped,
            RainLevel::Drizzle => self.drizzle,
            RainLevel::Light => self.light,
            RainLevel::Moderate => self.moderate,
            RainLevel::Heavy => self.heavy,
            RainLevel::Torrential => self.torrential,
            RainLevel::ThunderShower => self.thunder_shower,
        }
    }

    /// Override the value for one level
    pub fn with_value(mut self, level: RainLevel, value: f64) -> Self {
        let slot = match level {
            RainLevel::Stopped => &mut self.stopped,
            RainLevel::Drizzle => &mut self.drizzle,
            RainLevel::Light => &mut self.light,
            RainLevel::Moderate => &mut self.moderate,
            RainLevel::Heavy => &mut self.heavy,
            RainLevel::Torrential => &mut self.torrential,
            RainLevel::ThunderShower => &mut self.thunder_shower,
        };
        *slot = value;
        self
    }

    /// Largest value on the scale, used to size charts
    pub fn max_value(&self) -> f64 {
        RainLevel::ALL
            .iter()
            .map(|level| self.value(*level))
            .fold(0.0, f64::max)
    }

    /// Every value must be a finite, non-negative number
    pub fn validate(&self) -> Result<()> {
        for level in RainLevel::ALL {
            let value = self.value(level);
            if !value.is_finite() || value < 0.0 {
                return Err(Error::configuration(format!(
                    "Intensity for '{}' must be a non-negative number, got {}",
                    level, value
                )));
            }
        }
        Ok(())
    }
}

/// One point of the rain intensity series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityPoint {
    pub time: NaiveDateTime,
    pub level: RainLevel,
    pub intensity: f64,
}

/// One point of the forecast mean-temperature series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePoint {
    pub date: NaiveDate,
    pub mean: f64,
}

/// Map rain events to an intensity series ordered by time
///
/// Events logged for the same minute keep their logged order.
pub fn intensity_series(events: &[RainEvent], scale: &IntensityScale) -> Vec<IntensityPoint> {
    let mut points: Vec<IntensityPoint> = events
        .iter()
        .map(|event| IntensityPoint {
            time: event.time,
            level: event.level,
            intensity: scale.value(event.level),
        })
        .collect();
    points.sort_by_key(|p| p.time);
    points
}

/// Mean forecast temperature per forecast, ordered by date
pub fn mean_temperature_series(forecasts: &[Forecast]) -> Vec<TemperaturePoint> {
    let mut points: Vec<TemperaturePoint> = forecasts
        .iter()
        .map(|forecast| TemperaturePoint {
            date: forecast.date,
            mean: forecast.mean_temperature(),
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}
