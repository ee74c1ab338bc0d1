//! Application-wide defaults, limits and fixed values.

// # Schedule

pub const DEFAULT_SCHEDULE_MODE: &str = "manual";
pub const DEFAULT_DARK_MODE: bool = false;
pub const DEFAULT_WINDOW_START: &str = "08:00";
pub const DEFAULT_WINDOW_END: &str = "20:00";

/// Seconds between scheduling monitor evaluations.
pub const DEFAULT_POLL_INTERVAL: u64 = 60;
pub const MINIMUM_POLL_INTERVAL: u64 = 1;
pub const MAXIMUM_POLL_INTERVAL: u64 = 3600;

// # Solar calculation

/// Zenith of the sun at rise/set in degrees (refraction plus disk radius).
pub const SOLAR_ZENITH: f64 = 90.833;

/// Minute-of-day reported for both events when the sun never rises.
pub const POLAR_NIGHT_MINUTES: u16 = 720;

pub const MINUTES_PER_DAY: u16 = 1440;
pub const LAST_MINUTE_OF_DAY: u16 = MINUTES_PER_DAY - 1;

// # Application catalog

/// Seconds a catalog snapshot stays fresh.
pub const DEFAULT_CATALOG_FRESHNESS: u64 = 300;
pub const MINIMUM_CATALOG_FRESHNESS: u64 = 10;
pub const MAXIMUM_CATALOG_FRESHNESS: u64 = 86_400;

pub const DEFAULT_FAVORITE_COUNT: usize = 5;
pub const MINIMUM_FAVORITE_COUNT: usize = 1;
pub const MAXIMUM_FAVORITE_COUNT: usize = 10;

// # Weather

/// Minutes a weather reading stays fresh.
pub const DEFAULT_WEATHER_FRESHNESS: u64 = 30;
pub const MINIMUM_WEATHER_FRESHNESS: u64 = 1;
pub const MAXIMUM_WEATHER_FRESHNESS: u64 = 1440;

pub const DEFAULT_USE_CELSIUS: bool = false;

/// Separator of the persisted weather record fields.
pub const WEATHER_RECORD_SEPARATOR: char = '|';

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const WEATHER_REQUEST_TIMEOUT_SECS: u64 = 10;

// # Files

pub const CONFIG_FILE_NAME: &str = "horizon.toml";
pub const GEO_FILE_NAME: &str = "geo.toml";
pub const STATE_FILE_NAME: &str = "state.toml";

// # Exit codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
