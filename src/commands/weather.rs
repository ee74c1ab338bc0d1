//! `horizon weather`: current weather for the configured location.

use anyhow::Result;

use super::Launcher;
use crate::weather::{OpenMeteoFetcher, WeatherLookup};

pub fn handle_weather_command(debug_enabled: bool) -> Result<()> {
    log_version!();
    let launcher = Launcher::load(debug_enabled)?;
    let unit = launcher.config.temperature_unit();

    let Some(coordinates) = launcher.config.coordinates() else {
        log_block_start!("Location required");
        log_indented!("Set latitude and longitude in horizon.toml or geo.toml");
        log_end!();
        return Ok(());
    };

    let fetcher = OpenMeteoFetcher::new();
    let lookup = launcher.weather().get(coordinates, unit, &fetcher);

    match &lookup {
        WeatherLookup::Fresh(reading) => log_block_start!("{reading}"),
        WeatherLookup::Cached(reading) => {
            log_block_start!("{reading}");
            if debug_enabled {
                log_indented!("From cache");
            }
        }
        WeatherLookup::Fallback(reading) => {
            log_block_start!("{reading}");
            log_pipe!();
            log_warning!("Showing the last stored reading, it may be out of date");
        }
        WeatherLookup::Unavailable => log_block_start!("Weather unavailable"),
    }

    if debug_enabled {
        log_pipe!();
        log_debug!("Location: {coordinates}");
    }
    log_end!();
    Ok(())
}
