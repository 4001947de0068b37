//! Configuration management and validation.
//!
//! Settings are layered, each layer overriding the one before:
//!
//! 1. Built-in defaults
//! 2. TOML configuration file (`--config`, else the user config directory)
//! 3. Environment variables (`STATION_WX_DATABASE`, `STATION_WX_STATION`)
//! 4. Command-line flags, applied by the CLI
//!
//! ```toml
//! database_path = "/var/lib/station-wx/station_wx.db"
//! station = "VVCS"
//! recent_limit = 50
//!
//! [intensity_scale]
//! thunder-shower = 4.5
//! ```

use crate::app::models::StationId;
use crate::app::services::rain_analysis::IntensityScale;
use crate::constants::{
    APP_DIR_NAME, CONFIG_FILENAME, DEFAULT_DATABASE_FILENAME, DEFAULT_RECENT_LIMIT,
    DEFAULT_STATION, ENV_DATABASE, ENV_STATION,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Station assumed for reports that carry no identifier
    pub station: String,

    /// Number of reports in the "recent reports" view
    pub recent_limit: usize,

    /// Chart value for each rain level
    pub intensity_scale: IntensityScale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: Self::default_database_path(),
            station: DEFAULT_STATION.to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            intensity_scale: IntensityScale::default(),
        }
    }
}

impl Config {
    /// Default database location under the user data directory
    ///
    /// Falls back to the working directory when no data directory is known.
    pub fn default_database_path() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(DEFAULT_DATABASE_FILENAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILENAME))
    }

    /// Default configuration file location under the user config directory
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILENAME))
            .ok_or_else(|| Error::configuration("No user configuration directory available"))
    }

    /// Read a TOML configuration file; fields it omits keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;

        toml::from_str(&text).map_err(|e| Error::ConfigParse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Load defaults, then the configuration file, then environment overrides
    ///
    /// # Arguments
    ///
    /// * `config_file` - Explicit file; when `None` the default location is
    ///   used if a file exists there
    ///
    /// # Returns
    ///
    /// Result containing the merged configuration, not yet validated
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => {
                debug!("Loading config file {}", path.display());
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => {
                    debug!("Loading config file {}", path.display());
                    Self::from_file(&path)?
                }
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides through a variable lookup function
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(ENV_DATABASE).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides database path", ENV_DATABASE);
            self.database_path = PathBuf::from(path);
        }
        if let Some(station) = lookup(ENV_STATION).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides station", ENV_STATION);
            self.station = station;
        }
        self
    }

    /// Set the database path
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Set the station hint
    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = station.into();
        self
    }

    /// Set the number of recent reports shown
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Replace the rain intensity scale
    pub fn with_intensity_scale(mut self, scale: IntensityScale) -> Self {
        self.intensity_scale = scale;
        self
    }

    /// Parsed station hint
    pub fn station_id(&self) -> Result<StationId> {
        StationId::parse(&self.station).map_err(|_| {
            Error::configuration(format!(
                "Invalid station '{}': expected a 4-character identifier such as {}",
                self.station, DEFAULT_STATION
            ))
        })
    }

    /// Validate the merged configuration
    pub fn validate(&self) -> Result<()> {
        self.station_id()?;

        if self.recent_limit == 0 {
            return Err(Error::configuration("recent_limit must be greater than 0"));
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(Error::configuration("database_path cannot be empty"));
        }

        self.intensity_scale.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::RainLevel;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.station, "VVCS");
        assert_eq!(config.recent_limit, 100);
        assert!(config.database_path.ends_with(DEFAULT_DATABASE_FILENAME));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"
station = "stn1"
recent_limit = 25

[intensity_scale]
thunder-shower = 4.5
"#,
        );

        let config = Config::load_layered(Some(file.path())).unwrap();
        assert_eq!(config.recent_limit, 25);
        assert_eq!(config.station_id().unwrap().as_str(), "STN1");
        assert_eq!(config.intensity_scale.value(RainLevel::ThunderShower), 4.5);
        assert_eq!(config.intensity_scale.value(RainLevel::Heavy), 3.0);
    }

    #[test]
    fn test_env_overrides_file() {
        let config = Config::default()
            .with_station("STN1")
            .with_env_overrides(|key| {
                HashMap::from([(ENV_STATION, "VVTS"), (ENV_DATABASE, "/tmp/wx.db")])
                    .get(key)
                    .map(|v| v.to_string())
            });

        assert_eq!(config.station, "VVTS");
        assert_eq!(config.database_path, PathBuf::from("/tmp/wx.db"));
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let config = Config::default().with_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let file = write_config("recent_limit = \"many\"");
        match Config::from_file(file.path()).unwrap_err() {
            Error::ConfigParse { path, .. } => {
                assert_eq!(path, file.path().display().to_string());
            }
            other => panic!("unexpected error: {other}"),
        }

        let file = write_config("unknown_key = 1");
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Config::load_layered(Some(Path::new("/nonexistent/station-wx.toml"))).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_validation() {
        let bad_station = Config::default().with_station("NOT-A-STATION");
        assert!(matches!(
            bad_station.validate().unwrap_err(),
            Error::Configuration { .. }
        ));

        let negative = Config::default().with_intensity_scale(
            IntensityScale::default().with_value(RainLevel::Drizzle, -0.5),
        );
        assert!(negative.validate().is_err());

        assert!(Config::default().with_recent_limit(0).validate().is_err());
        assert!(Config::default().with_database_path("").validate().is_err());
    }
}
