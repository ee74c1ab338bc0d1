//! Sunrise and sunset times from the sunrise equation.
//!
//! This is the classic almanac approximation: for each event an approximate solar
//! time is derived from the day of year and longitude, then refined through the sun's
//! mean anomaly, true ecliptic longitude, right ascension and declination into a local
//! hour angle at the observer's latitude. The result is accurate to a few minutes,
//! which is plenty for deciding when a launcher should switch to its dark theme.
//!
//! Angles are kept in degrees and converted to radians at the point of use. Periodic
//! values are wrapped by repeatedly adding or subtracting their period rather than by
//! `%`, so negative intermediate values behave the same on every platform.

use chrono::{DateTime, Datelike, Local, NaiveDate, Offset};

use super::Coordinates;
use crate::constants::{LAST_MINUTE_OF_DAY, POLAR_NIGHT_MINUTES, SOLAR_ZENITH};
use crate::time_source::TimeSource;

/// Whether the sun crosses the horizon on the requested date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarCondition {
    /// Regular sunrise and sunset.
    Normal,
    /// The sun never sets. Reported as sunrise 00:00, sunset 23:59.
    PolarDay,
    /// The sun never rises. Reported as 12:00 for both events.
    PolarNight,
}

/// Sunrise and sunset as minutes after local midnight, each in `0..=1439`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: u16,
    pub sunset: u16,
    pub condition: PolarCondition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolarEvent {
    Rise,
    Set,
}

impl SolarEvent {
    /// Rough local hour of the event used to seed the approximate time.
    fn base_hour(self) -> f64 {
        match self {
            SolarEvent::Rise => 6.0,
            SolarEvent::Set => 18.0,
        }
    }
}

impl SunTimes {
    /// Fallback used when the sun stays below the horizon all day.
    pub const POLAR_NIGHT: SunTimes = SunTimes {
        sunrise: POLAR_NIGHT_MINUTES,
        sunset: POLAR_NIGHT_MINUTES,
        condition: PolarCondition::PolarNight,
    };

    /// Fallback used when the sun stays above the horizon all day.
    pub const POLAR_DAY: SunTimes = SunTimes {
        sunrise: 0,
        sunset: LAST_MINUTE_OF_DAY,
        condition: PolarCondition::PolarDay,
    };

    /// Compute sunrise and sunset for a day of the year.
    ///
    /// # Arguments
    /// * `latitude`, `longitude` - observer position in degrees
    /// * `day_of_year` - 1 for January 1st
    /// * `utc_offset_minutes` - local offset from UTC, e.g. `60` for UTC+1
    pub fn compute(
        latitude: f64,
        longitude: f64,
        day_of_year: u32,
        utc_offset_minutes: i32,
    ) -> SunTimes {
        let sunrise = match event_utc_hours(latitude, longitude, day_of_year, SolarEvent::Rise) {
            Ok(hours) => to_local_minutes(hours, utc_offset_minutes),
            Err(fallback) => return fallback,
        };
        let sunset = match event_utc_hours(latitude, longitude, day_of_year, SolarEvent::Set) {
            Ok(hours) => to_local_minutes(hours, utc_offset_minutes),
            Err(fallback) => return fallback,
        };

        SunTimes {
            sunrise,
            sunset,
            condition: PolarCondition::Normal,
        }
    }

    /// Sun times at `coordinates` for a calendar date.
    pub fn for_date(coordinates: Coordinates, date: NaiveDate, utc_offset_minutes: i32) -> SunTimes {
        Self::compute(
            coordinates.latitude,
            coordinates.longitude,
            date.ordinal(),
            utc_offset_minutes,
        )
    }

    /// Sun times for the local date of `now`, using its UTC offset.
    pub fn on(coordinates: Coordinates, now: &DateTime<Local>) -> SunTimes {
        let offset_minutes = now.offset().fix().local_minus_utc() / 60;
        Self::for_date(coordinates, now.date_naive(), offset_minutes)
    }

    /// Sun times for the current date of `clock`.
    pub fn today(coordinates: Coordinates, clock: &dyn TimeSource) -> SunTimes {
        Self::on(coordinates, &clock.now())
    }

    /// Minutes between sunrise and sunset.
    pub fn daylight_minutes(&self) -> u16 {
        self.sunset.saturating_sub(self.sunrise)
    }
}

/// UTC hour of the event, or the polar fallback when the sun does not cross the horizon.
fn event_utc_hours(
    latitude: f64,
    longitude: f64,
    day_of_year: u32,
    event: SolarEvent,
) -> Result<f64, SunTimes> {
    let longitude_hour = longitude / 15.0;
    let t = f64::from(day_of_year) + (event.base_hour() - longitude_hour) / 24.0;

    let mean_anomaly = 0.9856 * t - 3.289;

    let true_longitude = wrap(
        mean_anomaly
            + 1.916 * sin_deg(mean_anomaly)
            + 0.020 * sin_deg(2.0 * mean_anomaly)
            + 282.634,
        360.0,
    );

    // Right ascension in the same quadrant as the true longitude, in hours.
    let mut right_ascension = wrap(
        (0.91764 * tan_deg(true_longitude)).atan().to_degrees(),
        360.0,
    );
    let longitude_quadrant = (true_longitude / 90.0).floor() * 90.0;
    let ascension_quadrant = (right_ascension / 90.0).floor() * 90.0;
    right_ascension = (right_ascension + longitude_quadrant - ascension_quadrant) / 15.0;

    let sin_declination = 0.39782 * sin_deg(true_longitude);
    let cos_declination = sin_declination.asin().cos();

    let cos_hour_angle = (cos_deg(SOLAR_ZENITH) - sin_declination * sin_deg(latitude))
        / (cos_declination * cos_deg(latitude));

    if cos_hour_angle > 1.0 {
        return Err(SunTimes::POLAR_NIGHT);
    }
    if cos_hour_angle < -1.0 {
        return Err(SunTimes::POLAR_DAY);
    }

    let hour_angle = match event {
        SolarEvent::Rise => 360.0 - cos_hour_angle.acos().to_degrees(),
        SolarEvent::Set => cos_hour_angle.acos().to_degrees(),
    } / 15.0;

    let local_mean_time = hour_angle + right_ascension - 0.06571 * t - 6.622;
    Ok(wrap(local_mean_time - longitude_hour, 24.0))
}

fn to_local_minutes(utc_hours: f64, utc_offset_minutes: i32) -> u16 {
    let local_hours = wrap(utc_hours + f64::from(utc_offset_minutes) / 60.0, 24.0);
    let minutes = (local_hours * 60.0).floor() as i32;
    minutes.clamp(0, i32::from(LAST_MINUTE_OF_DAY)) as u16
}

/// Bring `value` into `[0, period)` by repeated addition or subtraction.
fn wrap(mut value: f64, period: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    while value < 0.0 {
        value += period;
    }
    while value >= period {
        value -= period;
    }
    value
}

fn sin_deg(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

fn cos_deg(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

fn tan_deg(degrees: f64) -> f64 {
    degrees.to_radians().tan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_handles_negative_and_large_values() {
        assert_eq!(wrap(-30.0, 360.0), 330.0);
        assert_eq!(wrap(725.0, 360.0), 5.0);
        assert_eq!(wrap(360.0, 360.0), 0.0);
        assert_eq!(wrap(-0.5, 24.0), 23.5);
        assert_eq!(wrap(f64::NAN, 24.0), 0.0);
    }

    #[test]
    fn test_local_minutes_apply_offset() {
        assert_eq!(to_local_minutes(4.0, 60), 300);
        assert_eq!(to_local_minutes(23.5, 60), 30);
        assert_eq!(to_local_minutes(0.25, -60), 1395);
    }
}
