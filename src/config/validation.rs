//! Configuration validation.
//!
//! Range checks for every numeric setting plus format checks for the schedule.
//! Each failure names the offending key and the accepted range.

use anyhow::{Context, Result};

use super::Config;
use crate::constants::*;
use crate::schedule::ClockTime;

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(mode) = config.schedule_mode.as_deref()
        && !matches!(mode, "manual" | "fixed" | "sun")
    {
        anyhow::bail!("schedule_mode must be \"manual\", \"fixed\" or \"sun\" (got \"{mode}\")");
    }

    if let Some(start) = config.window_start.as_deref() {
        ClockTime::parse(start).context("Invalid window_start. Use HH:MM format")?;
    }
    if let Some(end) = config.window_end.as_deref() {
        ClockTime::parse(end).context("Invalid window_end. Use HH:MM format")?;
    }

    if let Some(interval) = config.poll_interval
        && !(MINIMUM_POLL_INTERVAL..=MAXIMUM_POLL_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "poll_interval ({} seconds) must be between {} and {} seconds",
            interval,
            MINIMUM_POLL_INTERVAL,
            MAXIMUM_POLL_INTERVAL
        );
    }

    if let Some(count) = config.favorite_count
        && !(MINIMUM_FAVORITE_COUNT..=MAXIMUM_FAVORITE_COUNT).contains(&count)
    {
        anyhow::bail!(
            "favorite_count ({}) must be between {} and {}",
            count,
            MINIMUM_FAVORITE_COUNT,
            MAXIMUM_FAVORITE_COUNT
        );
    }

    if let Some(freshness) = config.catalog_freshness
        && !(MINIMUM_CATALOG_FRESHNESS..=MAXIMUM_CATALOG_FRESHNESS).contains(&freshness)
    {
        anyhow::bail!(
            "catalog_freshness ({} seconds) must be between {} and {} seconds",
            freshness,
            MINIMUM_CATALOG_FRESHNESS,
            MAXIMUM_CATALOG_FRESHNESS
        );
    }

    if let Some(freshness) = config.weather_freshness
        && !(MINIMUM_WEATHER_FRESHNESS..=MAXIMUM_WEATHER_FRESHNESS).contains(&freshness)
    {
        anyhow::bail!(
            "weather_freshness ({} minutes) must be between {} and {} minutes",
            freshness,
            MINIMUM_WEATHER_FRESHNESS,
            MAXIMUM_WEATHER_FRESHNESS
        );
    }

    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if config.latitude.is_some() != config.longitude.is_some() {
        anyhow::bail!("latitude and longitude must be set together");
    }

    Ok(())
}
