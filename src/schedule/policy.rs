//! Whether dark mode is active at a given moment.
//!
//! The decision is a pure function of the schedule, the minute of day and the date
//! information needed for the sun calculation. Boundary rules:
//!
//! - Fixed window with `start <= end`: dark when `now < start` or `now >= end`.
//! - Fixed window with `start > end`: dark when `now >= start` or `now < end`.
//! - Sun-relative: dark when `now < sunrise` or `now >= sunset`.
//!
//! The fixed-window rule is applied literally even though the two branches read
//! the window differently. An overnight window such as `22:00-06:00` is therefore
//! dark from 22:00 until 06:00.

use chrono::{DateTime, Datelike, Local, Offset};

use super::{ClockTime, ScheduleConfig};
use crate::geo::SunTimes;

/// Date information for evaluating a schedule on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayContext {
    /// Minutes after local midnight.
    pub minutes: u16,
    /// 1 for January 1st.
    pub day_of_year: u32,
    pub utc_offset_minutes: i32,
}

impl DayContext {
    pub fn from_datetime(now: &DateTime<Local>) -> Self {
        Self {
            minutes: ClockTime::of(now).minutes(),
            day_of_year: now.ordinal(),
            utc_offset_minutes: now.offset().fix().local_minus_utc() / 60,
        }
    }
}

/// Evaluate `config` at `now_minutes` on the day described by `today`.
pub fn is_dark_active(config: &ScheduleConfig, now_minutes: u16, today: &DayContext) -> bool {
    match *config {
        ScheduleConfig::Manual { dark } => dark,
        ScheduleConfig::FixedWindow { start, end } => {
            let (start, end) = (start.minutes(), end.minutes());
            if start <= end {
                now_minutes < start || now_minutes >= end
            } else {
                now_minutes >= start || now_minutes < end
            }
        }
        ScheduleConfig::SunRelative {
            coordinates: Some(coordinates),
            ..
        } => {
            let sun = SunTimes::compute(
                coordinates.latitude,
                coordinates.longitude,
                today.day_of_year,
                today.utc_offset_minutes,
            );
            now_minutes < sun.sunrise || now_minutes >= sun.sunset
        }
        ScheduleConfig::SunRelative {
            coordinates: None,
            fallback_dark,
        } => fallback_dark,
    }
}

/// Evaluate `config` at a clock reading.
pub fn is_dark_at(config: &ScheduleConfig, now: &DateTime<Local>) -> bool {
    let today = DayContext::from_datetime(now);
    is_dark_active(config, today.minutes, &today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;

    fn window(start: &str, end: &str) -> ScheduleConfig {
        ScheduleConfig::FixedWindow {
            start: ClockTime::parse(start).unwrap(),
            end: ClockTime::parse(end).unwrap(),
        }
    }

    fn minutes(text: &str) -> u16 {
        ClockTime::parse(text).unwrap().minutes()
    }

    const SUMMER: DayContext = DayContext {
        minutes: 0,
        day_of_year: 172,
        utc_offset_minutes: 60,
    };

    #[test]
    fn test_manual_ignores_time() {
        let dark = ScheduleConfig::Manual { dark: true };
        let light = ScheduleConfig::Manual { dark: false };
        for m in [0, 600, 1439] {
            assert!(is_dark_active(&dark, m, &SUMMER));
            assert!(!is_dark_active(&light, m, &SUMMER));
        }
    }

    #[test]
    fn test_daytime_window_boundaries() {
        let config = window("08:00", "18:00");

        assert!(is_dark_active(&config, minutes("07:59"), &SUMMER));
        assert!(!is_dark_active(&config, minutes("08:00"), &SUMMER));
        assert!(!is_dark_active(&config, minutes("17:59"), &SUMMER));
        assert!(is_dark_active(&config, minutes("18:00"), &SUMMER));
        assert!(is_dark_active(&config, minutes("23:30"), &SUMMER));
    }

    #[test]
    fn test_overnight_window() {
        let config = window("22:00", "06:00");

        assert!(is_dark_active(&config, minutes("23:00"), &SUMMER));
        assert!(is_dark_active(&config, minutes("22:00"), &SUMMER));
        assert!(is_dark_active(&config, minutes("05:59"), &SUMMER));
        assert!(!is_dark_active(&config, minutes("06:00"), &SUMMER));
        assert!(!is_dark_active(&config, minutes("10:00"), &SUMMER));
    }

    #[test]
    fn test_equal_bounds_are_always_dark() {
        let config = window("12:00", "12:00");
        assert!(is_dark_active(&config, minutes("11:59"), &SUMMER));
        assert!(is_dark_active(&config, minutes("12:00"), &SUMMER));
    }

    #[test]
    fn test_sun_relative_london_summer() {
        let config = ScheduleConfig::SunRelative {
            coordinates: Some(Coordinates::new(51.5, -0.12).unwrap()),
            fallback_dark: false,
        };

        assert!(is_dark_active(&config, minutes("03:00"), &SUMMER));
        assert!(!is_dark_active(&config, minutes("12:00"), &SUMMER));
        assert!(is_dark_active(&config, minutes("22:30"), &SUMMER));
    }

    #[test]
    fn test_sun_relative_without_location_uses_fallback() {
        let config = ScheduleConfig::SunRelative {
            coordinates: None,
            fallback_dark: true,
        };
        assert!(is_dark_active(&config, minutes("12:00"), &SUMMER));
    }

    #[test]
    fn test_polar_day_is_light_until_last_minute() {
        let config = ScheduleConfig::SunRelative {
            coordinates: Some(Coordinates::new(78.2232, 15.6267).unwrap()),
            fallback_dark: true,
        };
        let today = DayContext {
            utc_offset_minutes: 120,
            ..SUMMER
        };

        assert!(!is_dark_active(&config, 0, &today));
        assert!(!is_dark_active(&config, 1438, &today));
        assert!(is_dark_active(&config, 1439, &today));
    }

    #[test]
    fn test_polar_night_is_always_dark() {
        let config = ScheduleConfig::SunRelative {
            coordinates: Some(Coordinates::new(78.2232, 15.6267).unwrap()),
            fallback_dark: false,
        };
        let today = DayContext {
            minutes: 0,
            day_of_year: 355,
            utc_offset_minutes: 60,
        };

        assert!(is_dark_active(&config, 0, &today));
        assert!(is_dark_active(&config, 720, &today));
        assert!(is_dark_active(&config, 1000, &today));
    }
}
