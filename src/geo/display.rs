//! Debug output for solar calculations.

use chrono::{DateTime, Local};

use super::{Coordinates, PolarCondition, SunTimes};
use crate::schedule::ClockTime;

/// Log today's solar calculation for `coordinates` in the box-drawing style.
///
/// Used by `horizon sun` and by the monitor in debug mode so users can see exactly
/// when sun-relative dark mode will flip and whether a polar fallback is in effect.
pub fn log_solar_debug_info(coordinates: Coordinates, now: &DateTime<Local>) -> SunTimes {
    let times = SunTimes::on(coordinates, now);

    log_pipe!();
    log_debug!("Solar calculation details:");
    log_indented!("     Coordinates: {}", coordinates);
    log_indented!("            Date: {}", now.format("%Y-%m-%d (day %j)"));
    log_indented!("      UTC offset: {}", now.format("%:z"));

    match times.condition {
        PolarCondition::Normal => {
            let daylight = times.daylight_minutes();
            log_indented!("         Sunrise: {}", ClockTime::from_minutes(times.sunrise));
            log_indented!("          Sunset: {}", ClockTime::from_minutes(times.sunset));
            log_indented!("        Daylight: {}h {}m", daylight / 60, daylight % 60);
        }
        PolarCondition::PolarDay => {
            log_warning!("The sun does not set at this location today (polar day)");
            log_indented!("Using 00:00 for sunrise and 23:59 for sunset");
        }
        PolarCondition::PolarNight => {
            log_warning!("The sun does not rise at this location today (polar night)");
            log_indented!("Using 12:00 for both sunrise and sunset");
        }
    }

    times
}
