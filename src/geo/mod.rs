//! Geographic coordinates and sunrise/sunset calculation.
//!
//! ## Module Structure
//!
//! - [`solar`]: sunrise/sunset minutes of day from coordinates, date and UTC offset,
//!   including the polar day / polar night fallbacks
//! - [`display`]: debug output of a solar calculation
//!
//! Coordinates are validated once when they enter the system (configuration loading
//! or the CLI) so that the calculation itself can stay a total function.

pub mod display;
pub mod solar;

pub use display::log_solar_debug_info;
pub use solar::{PolarCondition, SunTimes};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
mod tests;

/// A point on Earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, positive north (-90 to +90)
    pub latitude: f64,
    /// Longitude, positive east (-180 to +180)
    pub longitude: f64,
}

impl Coordinates {
    /// Create validated coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            anyhow::bail!("latitude must be between -90 and 90 degrees (got {latitude})");
        }
        if !(-180.0..=180.0).contains(&longitude) {
            anyhow::bail!("longitude must be between -180 and 180 degrees (got {longitude})");
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Pair optional latitude/longitude values; both must be present.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_dir = if self.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.longitude >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.3}°{}, {:.3}°{}",
            self.latitude.abs(),
            lat_dir,
            self.longitude.abs(),
            lon_dir
        )
    }
}
