//! `horizon sun`: sunrise and sunset for the configured location.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone};

use super::Launcher;
use crate::geo::{PolarCondition, SunTimes, log_solar_debug_info};
use crate::schedule::{ClockTime, is_dark_at};
use crate::time_source;

pub fn handle_sun_command(date: Option<&str>, debug_enabled: bool) -> Result<()> {
    log_version!();
    let launcher = Launcher::load(debug_enabled)?;

    let Some(coordinates) = launcher.config.coordinates() else {
        log_block_start!("Location required");
        log_indented!("Set latitude and longitude in horizon.toml or geo.toml");
        log_end!();
        return Ok(());
    };

    let moment = match date {
        Some(text) => noon_of(text)?,
        None => time_source::now(),
    };

    let times = if debug_enabled {
        log_solar_debug_info(coordinates, &moment)
    } else {
        SunTimes::on(coordinates, &moment)
    };

    log_block_start!("Sun times for {} at {}", moment.format("%Y-%m-%d"), coordinates);
    match times.condition {
        PolarCondition::Normal => {
            log_indented!("Sunrise: {}", ClockTime::from_minutes(times.sunrise));
            log_indented!("Sunset:  {}", ClockTime::from_minutes(times.sunset));
        }
        PolarCondition::PolarDay => log_indented!("The sun does not set (polar day)"),
        PolarCondition::PolarNight => log_indented!("The sun does not rise (polar night)"),
    }

    if date.is_none() {
        let schedule = launcher.config.schedule()?;
        log_indented!(
            "Dark mode: {}",
            if is_dark_at(&schedule, &moment) { "on" } else { "off" }
        );
    }
    log_end!();
    Ok(())
}

/// Local noon of a `YYYY-MM-DD` date, which always exists regardless of DST.
fn noon_of(text: &str) -> Result<DateTime<Local>> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{text}'. Use YYYY-MM-DD"))?;
    let noon = date
        .and_hms_opt(12, 0, 0)
        .context("Invalid time of day")?;
    Local
        .from_local_datetime(&noon)
        .earliest()
        .context("Date has no local noon")
}
