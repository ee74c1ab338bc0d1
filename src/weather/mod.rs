//! Current weather with a persisted, unit-aware cache.
//!
//! ## Module Structure
//!
//! - [`cache`]: freshness window over the fetcher, persisted in the settings store
//! - [`open_meteo`]: fetcher backed by the Open-Meteo forecast API
//!
//! Readings are persisted as a compact record, `temp|code|is_day|use_celsius`, for
//! example `21|3|true|true`. Records written before the unit field existed have
//! three fields and are read as Fahrenheit.

pub mod cache;
pub mod open_meteo;

pub use cache::{WeatherCache, WeatherLookup};
pub use open_meteo::OpenMeteoFetcher;

use anyhow::Result;
use std::fmt;

use crate::constants::WEATHER_RECORD_SEPARATOR;
use crate::geo::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn from_celsius_flag(use_celsius: bool) -> Self {
        if use_celsius {
            TemperatureUnit::Celsius
        } else {
            TemperatureUnit::Fahrenheit
        }
    }

    pub fn is_celsius(self) -> bool {
        self == TemperatureUnit::Celsius
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Value of Open-Meteo's `temperature_unit` parameter.
    pub fn api_name(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }
}

/// One observation of current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherReading {
    /// Whole degrees in `unit`.
    pub temperature: i32,
    /// WMO weather interpretation code.
    pub condition: u16,
    pub is_day: bool,
    pub unit: TemperatureUnit,
}

impl WeatherReading {
    /// Persisted record form.
    pub fn to_record(&self) -> String {
        let sep = WEATHER_RECORD_SEPARATOR;
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.temperature,
            self.condition,
            self.is_day,
            self.unit.is_celsius()
        )
    }

    /// Parse a persisted record. Anything malformed reads as no record at all.
    pub fn from_record(record: &str) -> Option<Self> {
        let fields: Vec<&str> = record.trim().split(WEATHER_RECORD_SEPARATOR).collect();
        if !(3..=4).contains(&fields.len()) {
            return None;
        }

        let temperature = fields[0].parse::<i32>().ok()?;
        let condition = fields[1].parse::<u16>().ok()?;
        let is_day = fields[2].parse::<bool>().ok()?;
        let use_celsius = fields
            .get(3)
            .and_then(|flag| flag.parse::<bool>().ok())
            .unwrap_or(false);

        Some(Self {
            temperature,
            condition,
            is_day,
            unit: TemperatureUnit::from_celsius_flag(use_celsius),
        })
    }

    pub fn description(&self) -> &'static str {
        describe_condition(self.condition, self.is_day)
    }
}

impl fmt::Display for WeatherReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}",
            self.temperature,
            self.unit.symbol(),
            self.description()
        )
    }
}

/// The remote weather provider.
#[cfg_attr(test, mockall::automock)]
pub trait WeatherFetcher: Send + Sync {
    fn fetch(&self, coordinates: Coordinates, unit: TemperatureUnit) -> Result<WeatherReading>;
}

/// Short description of a WMO weather interpretation code.
pub fn describe_condition(code: u16, is_day: bool) -> &'static str {
    match code {
        0 if is_day => "Sunny",
        0 => "Clear",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 => "Rain",
        65 => "Heavy rain",
        66 | 67 => "Freezing rain",
        71 | 73 => "Snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}
