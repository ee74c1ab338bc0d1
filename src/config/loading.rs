//! Configuration loading functionality.
//!
//! Handles locating the configuration file, creating it on first run, applying
//! defaults and merging the geo.toml override.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::validation::validate_config;
use super::{Config, GeoConfig};
use crate::constants::*;
use crate::utils::private_path;

/// Configuration directory chosen with `--config`, set once at startup.
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
///
/// Can only be called once. Returns an error if already set.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// The custom configuration directory, or None for the default location.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Directory containing horizon.toml and geo.toml.
pub fn get_config_base_dir() -> Result<PathBuf> {
    let config_path = get_config_path()?;
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// Path of horizon.toml.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("horizon").join(CONFIG_FILE_NAME))
}

/// Load the configuration, writing a default file first if none exists.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        super::builder::create_default_config(&config_path)
            .context("Failed to create default config during load")?;
        log_block_start!(
            "Created default configuration at {}",
            private_path(&config_path)
        );
    }

    load_from_path(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            private_path(&config_path)
        )
    })
}

/// Load configuration from a specific path.
///
/// Unlike [`load`], this does not create a missing file.
pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!(
            "Configuration file not found at {}",
            private_path(path)
        );
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    // geo.toml is merged before validation so its values are checked too.
    load_geo_override_from_path(&mut config, path);

    validate_config(&config)?;
    apply_defaults(&mut config);
    warn_sun_mode_without_coordinates(&config);

    Ok(config)
}

fn apply_defaults(config: &mut Config) {
    if config.schedule_mode.is_none() {
        config.schedule_mode = Some(DEFAULT_SCHEDULE_MODE.to_string());
    }
    if config.dark_mode.is_none() {
        config.dark_mode = Some(DEFAULT_DARK_MODE);
    }
    if config.window_start.is_none() {
        config.window_start = Some(DEFAULT_WINDOW_START.to_string());
    }
    if config.window_end.is_none() {
        config.window_end = Some(DEFAULT_WINDOW_END.to_string());
    }
    if config.poll_interval.is_none() {
        config.poll_interval = Some(DEFAULT_POLL_INTERVAL);
    }
    if config.favorite_count.is_none() {
        config.favorite_count = Some(DEFAULT_FAVORITE_COUNT);
    }
    if config.catalog_freshness.is_none() {
        config.catalog_freshness = Some(DEFAULT_CATALOG_FRESHNESS);
    }
    if config.weather_freshness.is_none() {
        config.weather_freshness = Some(DEFAULT_WEATHER_FRESHNESS);
    }
    if config.use_celsius.is_none() {
        config.use_celsius = Some(DEFAULT_USE_CELSIUS);
    }
}

fn warn_sun_mode_without_coordinates(config: &Config) {
    if config.mode() == "sun" && config.coordinates().is_none() {
        log_pipe!();
        log_warning!("Sunrise/sunset scheduling needs a location but none is configured");
        log_indented!("Falling back to dark_mode until latitude and longitude are set");
    }
}

/// Merge coordinates from the geo.toml next to `config_path`, if there is one.
///
/// A geo.toml that cannot be read or parsed is reported and ignored.
pub(crate) fn load_geo_override_from_path(config: &mut Config, config_path: &Path) {
    let Some(parent) = config_path.parent() else {
        return;
    };
    let geo_path = parent.join(GEO_FILE_NAME);
    if !geo_path.exists() {
        return;
    }

    match fs::read_to_string(&geo_path) {
        Ok(content) => match toml::from_str::<GeoConfig>(&content) {
            Ok(geo_config) => {
                if let Some(lat) = geo_config.latitude {
                    config.latitude = Some(lat);
                }
                if let Some(lon) = geo_config.longitude {
                    config.longitude = Some(lon);
                }
            }
            Err(e) => {
                log_warning!("Failed to parse geo.toml: {e}. Using coordinates from main config.");
            }
        },
        Err(e) => {
            log_warning!("Failed to read geo.toml: {e}. Using coordinates from main config.");
        }
    }
}
