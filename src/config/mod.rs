//! Configuration system for horizon.
//!
//! Settings live in `horizon.toml` inside `$XDG_CONFIG_HOME/horizon/` (or the
//! directory given with `--config`). A commented default file is written the first
//! time horizon runs.
//!
//! ## Configuration Structure
//!
//! ```toml
//! #[Dark mode schedule]
//! schedule_mode = "manual"  # "manual", "fixed" or "sun"
//! dark_mode = false         # Manual value, also used by "sun" without a location
//! window_start = "08:00"    # Light period start for "fixed" (HH:MM)
//! window_end = "20:00"      # Light period end for "fixed" (HH:MM)
//! poll_interval = 60        # Seconds between schedule checks (1-3600)
//!
//! #[Applications]
//! favorite_count = 5        # Number of favorite slots (1-10)
//! catalog_freshness = 300   # Seconds before the app list is rebuilt (10-86400)
//!
//! #[Weather]
//! use_celsius = false       # Celsius instead of Fahrenheit
//! weather_freshness = 30    # Minutes before weather is fetched again (1-1440)
//!
//! #[Location]
//! latitude = 51.5
//! longitude = -0.12
//! ```
//!
//! Coordinates may also be kept in a separate `geo.toml` next to `horizon.toml`,
//! which overrides the main file. That keeps the location out of a shared or
//! version-controlled configuration.
//!
//! ## Validation
//!
//! Every numeric setting is range-checked, times must be `HH:MM` and coordinates
//! must lie on the globe. Invalid files are rejected with a message naming the
//! offending key. `schedule_mode = "sun"` without coordinates is accepted with a
//! warning and falls back to `dark_mode`.

pub mod builder;
pub mod loading;
pub mod validation;
pub mod watcher;

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::*;
use crate::geo::Coordinates;
use crate::schedule::{ClockTime, ScheduleConfig};
use crate::weather::TemperatureUnit;

pub use builder::create_default_config;
pub use loading::{
    get_config_base_dir, get_config_path, get_custom_config_dir, load, load_from_path,
    set_config_dir,
};
pub use watcher::start_config_watcher;

/// Optional `geo.toml` holding only the coordinates.
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct GeoConfig {
    pub(crate) latitude: Option<f64>,
    pub(crate) longitude: Option<f64>,
}

/// Settings loaded from `horizon.toml`.
///
/// Fields are optional in the file; loading fills in defaults so the accessors
/// below never have to guess.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// "manual", "fixed" or "sun".
    pub schedule_mode: Option<String>,
    pub dark_mode: Option<bool>,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub poll_interval: Option<u64>, // seconds
    pub favorite_count: Option<usize>,
    pub catalog_freshness: Option<u64>, // seconds
    pub weather_freshness: Option<u64>, // minutes
    pub use_celsius: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Config {
    /// Path of the optional geo.toml next to horizon.toml.
    pub fn get_geo_path() -> Result<PathBuf> {
        Ok(get_config_base_dir()?.join(GEO_FILE_NAME))
    }

    pub fn mode(&self) -> &str {
        self.schedule_mode.as_deref().unwrap_or(DEFAULT_SCHEDULE_MODE)
    }

    /// Configured location, if both coordinates are present and valid.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }

    /// The dark-mode schedule described by this configuration.
    pub fn schedule(&self) -> Result<ScheduleConfig> {
        let dark = self.dark_mode.unwrap_or(DEFAULT_DARK_MODE);
        match self.mode() {
            "manual" => Ok(ScheduleConfig::Manual { dark }),
            "fixed" => Ok(ScheduleConfig::FixedWindow {
                start: ClockTime::parse(
                    self.window_start.as_deref().unwrap_or(DEFAULT_WINDOW_START),
                )?,
                end: ClockTime::parse(self.window_end.as_deref().unwrap_or(DEFAULT_WINDOW_END))?,
            }),
            "sun" => Ok(ScheduleConfig::SunRelative {
                coordinates: self.coordinates(),
                fallback_dark: dark,
            }),
            other => anyhow::bail!(
                "schedule_mode must be \"manual\", \"fixed\" or \"sun\" (got \"{other}\")"
            ),
        }
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        TemperatureUnit::from_celsius_flag(self.use_celsius.unwrap_or(DEFAULT_USE_CELSIUS))
    }

    pub fn favorite_limit(&self) -> usize {
        self.favorite_count.unwrap_or(DEFAULT_FAVORITE_COUNT)
    }

    pub fn catalog_freshness(&self) -> Duration {
        Duration::from_secs(self.catalog_freshness.unwrap_or(DEFAULT_CATALOG_FRESHNESS))
    }

    pub fn weather_freshness(&self) -> Duration {
        Duration::from_secs(self.weather_freshness.unwrap_or(DEFAULT_WEATHER_FRESHNESS) * 60)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL))
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");

        if let Ok(geo_path) = Self::get_geo_path()
            && geo_path.exists()
        {
            log_indented!("Loaded coordinates from geo.toml");
        }

        match self.schedule() {
            Ok(schedule) => log_indented!("Schedule: {}", schedule.describe()),
            Err(e) => log_indented!("Schedule: invalid ({e})"),
        }
        if self.mode() != "manual" {
            log_indented!("Poll interval: {} seconds", self.poll_interval().as_secs());
        }
        log_indented!("Favorites: {} slots", self.favorite_limit());
        log_indented!(
            "App list refresh: every {} seconds",
            self.catalog_freshness().as_secs()
        );
        log_indented!(
            "Weather refresh: every {} minutes ({})",
            self.weather_freshness().as_secs() / 60,
            self.temperature_unit().symbol()
        );
        if let Some(coordinates) = self.coordinates() {
            log_indented!("Location: {}", coordinates);
        }
    }
}
