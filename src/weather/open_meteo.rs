//! Current conditions from the Open-Meteo forecast API.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use super::{TemperatureUnit, WeatherFetcher, WeatherReading};
use crate::constants::{OPEN_METEO_URL, WEATHER_REQUEST_TIMEOUT_SECS};
use crate::geo::Coordinates;

#[derive(Debug, Deserialize)]
struct ForecastWire {
    current_weather: CurrentWeatherWire,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherWire {
    temperature: f64,
    weathercode: u16,
    /// 1 during the day, 0 at night.
    is_day: u8,
}

pub struct OpenMeteoFetcher {
    agent: ureq::Agent,
    base_url: String,
}

impl OpenMeteoFetcher {
    pub fn new() -> Self {
        Self::with_base_url(OPEN_METEO_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(WEATHER_REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("horizon/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }
}

impl Default for OpenMeteoFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherFetcher for OpenMeteoFetcher {
    fn fetch(&self, coordinates: Coordinates, unit: TemperatureUnit) -> Result<WeatherReading> {
        let body = self
            .agent
            .get(&self.base_url)
            .query("latitude", &format!("{:.4}", coordinates.latitude))
            .query("longitude", &format!("{:.4}", coordinates.longitude))
            .query("current_weather", "true")
            .query("temperature_unit", unit.api_name())
            .call()
            .context("Weather request failed")?
            .into_string()
            .context("Failed to read weather response")?;

        parse_forecast(&body, unit)
    }
}

fn parse_forecast(body: &str, unit: TemperatureUnit) -> Result<WeatherReading> {
    let wire: ForecastWire =
        serde_json::from_str(body).context("Unexpected weather response format")?;
    let current = wire.current_weather;

    if !current.temperature.is_finite() {
        anyhow::bail!("weather response has no usable temperature");
    }

    Ok(WeatherReading {
        temperature: current.temperature.round() as i32,
        condition: current.weathercode,
        is_day: current.is_day != 0,
        unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forecast() {
        let body = r#"{
            "latitude": 51.5,
            "longitude": -0.12,
            "current_weather": {
                "time": "2026-03-01T09:00",
                "temperature": 11.6,
                "windspeed": 14.2,
                "winddirection": 250,
                "weathercode": 61,
                "is_day": 1
            }
        }"#;

        let reading = parse_forecast(body, TemperatureUnit::Celsius).unwrap();
        assert_eq!(reading.temperature, 12);
        assert_eq!(reading.condition, 61);
        assert!(reading.is_day);
        assert_eq!(reading.unit, TemperatureUnit::Celsius);
    }

    #[test]
    fn test_parse_forecast_rejects_missing_block() {
        assert!(parse_forecast(r#"{"error": true}"#, TemperatureUnit::Celsius).is_err());
        assert!(parse_forecast("not json", TemperatureUnit::Fahrenheit).is_err());
    }

    #[test]
    fn test_unreachable_server_is_an_error() {
        let fetcher = OpenMeteoFetcher::with_base_url("http://127.0.0.1:9/v1/forecast");
        let coordinates = Coordinates::new(51.5, -0.12).unwrap();
        assert!(fetcher.fetch(coordinates, TemperatureUnit::Celsius).is_err());
    }
}
