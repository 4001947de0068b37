//! Application constants for station_wx
//!
//! This module contains the report grammar vocabulary, unit factors, storage
//! formats and default values used throughout the application.

// =============================================================================
// Report Structure
// =============================================================================

/// Report type marker for a routine observation
pub const ROUTINE_MARKER: &str = "METAR";

/// Report type marker for a special (irregular) observation
pub const SPECIAL_MARKER: &str = "SPECI";

/// Groups that are recognized but carry nothing the decoded record stores
pub const IGNORED_GROUPS: &[&str] = &["AUTO", "COR", "NIL", "NOSIG", "NSW"];

/// Groups after which the remainder of a report is remarks or trend forecast
pub const TERMINATING_GROUPS: &[&str] = &["RMK", "BECMG", "TEMPO"];

/// Marker for "ceiling and visibility OK"
pub const CAVOK_MARKER: &str = "CAVOK";

/// Maximum number of cloud layers kept in a decoded record
pub const MAX_CLOUD_LAYERS: usize = 3;

// =============================================================================
// Units
// =============================================================================

/// Wind unit codes and the factor that converts a speed in that unit to knots
pub mod wind_units {
    pub const KNOTS: &str = "KT";
    pub const METRES_PER_SECOND: &str = "MPS";
    pub const KILOMETRES_PER_HOUR: &str = "KMH";

    pub const KNOTS_FACTOR: f64 = 1.0;
    pub const METRES_PER_SECOND_FACTOR: f64 = 1.943_844;
    pub const KILOMETRES_PER_HOUR_FACTOR: f64 = 0.539_957;
}

/// Highest valid wind direction in degrees
pub const MAX_WIND_DIRECTION: u16 = 360;

/// Metres in one statute mile
pub const METRES_PER_STATUTE_MILE: f64 = 1609.344;

/// Cloud base heights are reported in hundreds of feet
pub const CLOUD_HEIGHT_MULTIPLIER_FT: u32 = 100;

// =============================================================================
// Present Weather Vocabulary
// =============================================================================

/// Present-weather descriptor codes and their short labels
pub const WEATHER_DESCRIPTORS: &[(&str, &str)] = &[
    ("MI", "shallow"),
    ("PR", "partial"),
    ("BC", "patches"),
    ("DR", "low drifting"),
    ("BL", "blowing"),
    ("SH", "shower"),
    ("TS", "thunderstorm"),
    ("FZ", "freezing"),
];

/// Precipitation, obscuration and other phenomenon codes and their short labels
pub const WEATHER_TYPES: &[(&str, &str)] = &[
    ("DZ", "drizzle"),
    ("RA", "rain"),
    ("SN", "snow"),
    ("SG", "snow grains"),
    ("IC", "ice crystals"),
    ("PL", "ice pellets"),
    ("GR", "hail"),
    ("GS", "small hail"),
    ("UP", "unknown precipitation"),
    ("BR", "mist"),
    ("FG", "fog"),
    ("FU", "smoke"),
    ("VA", "volcanic ash"),
    ("DU", "dust"),
    ("SA", "sand"),
    ("HZ", "haze"),
    ("PY", "spray"),
    ("PO", "dust whirls"),
    ("SQ", "squalls"),
    ("FC", "funnel cloud"),
    ("SS", "sandstorm"),
    ("DS", "duststorm"),
];

/// Type codes that count as liquid precipitation for the rain indicator
pub const LIQUID_PRECIPITATION_TYPES: &[&str] = &["RA", "DZ"];

// =============================================================================
// Storage
// =============================================================================

/// Default SQLite database filename
pub const DEFAULT_DATABASE_FILENAME: &str = "station_wx.db";

/// Application directory name under the user's config/data directories
pub const APP_DIR_NAME: &str = "station-wx";

/// Default configuration filename
pub const CONFIG_FILENAME: &str = "config.toml";

/// Stored report time format
pub const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rain event time format, for both input and storage
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Date format for forecasts and range queries
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Defaults
// =============================================================================

/// Default station identifier (Côn Đảo airport)
pub const DEFAULT_STATION: &str = "VVCS";

/// Number of reports shown by the "recent reports" view
pub const DEFAULT_RECENT_LIMIT: usize = 100;

/// Environment variable overriding the database path
pub const ENV_DATABASE: &str = "STATION_WX_DATABASE";

/// Environment variable overriding the station hint
pub const ENV_STATION: &str = "STATION_WX_STATION";

/// Default rain intensity scale used for charting
///
/// The values are presentation tuning, not a physical measure.
pub mod intensity_defaults {
    pub const STOPPED: f64 = 0.0;
    pub const DRIZZLE: f64 = 0.5;
    pub const LIGHT: f64 = 1.0;
    pub const MODERATE: f64 = 2.0;
    pub const HEAVY: f64 = 3.0;
    pub const TORRENTIAL: f64 = 4.0;
    pub const THUNDER_SHOWER: f64 = 3.5;
}
