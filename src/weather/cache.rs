//! Freshness window over the weather fetcher.
//!
//! The last reading and its capture time are kept in the settings store, so the
//! cache survives restarts. A stored reading only satisfies a request if it is
//! inside the freshness window and was taken in the requested unit. Otherwise the
//! fetcher is asked exactly once; when that fails, whatever reading is stored is
//! served as a degraded fallback.

use std::sync::Arc;
use std::time::Duration;

use super::{TemperatureUnit, WeatherFetcher, WeatherReading};
use crate::geo::Coordinates;
use crate::state::{LauncherState, SettingsStore};
use crate::time_source::TimeSource;

/// Result of a weather lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherLookup {
    /// Fetched just now.
    Fresh(WeatherReading),
    /// Served from the store inside the freshness window.
    Cached(WeatherReading),
    /// The fetch failed; this is the last stored reading, possibly stale or in
    /// another unit.
    Fallback(WeatherReading),
    /// The fetch failed and nothing is stored.
    Unavailable,
}

impl WeatherLookup {
    pub fn reading(&self) -> Option<&WeatherReading> {
        match self {
            WeatherLookup::Fresh(reading)
            | WeatherLookup::Cached(reading)
            | WeatherLookup::Fallback(reading) => Some(reading),
            WeatherLookup::Unavailable => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, WeatherLookup::Fallback(_) | WeatherLookup::Unavailable)
    }
}

pub struct WeatherCache {
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn TimeSource>,
    freshness: Duration,
}

impl WeatherCache {
    pub fn new(store: Arc<dyn SettingsStore>, clock: Arc<dyn TimeSource>, freshness: Duration) -> Self {
        Self {
            store,
            clock,
            freshness,
        }
    }

    fn is_fresh(&self, captured_at_millis: Option<i64>) -> bool {
        let Some(captured) = captured_at_millis else {
            return false;
        };
        let age = self.clock.now().timestamp_millis() - captured;
        // A timestamp in the future means the clock moved; do not trust it.
        age >= 0 && (age as u128) < self.freshness.as_millis()
    }

    /// Current weather at `coordinates` in `unit`.
    pub fn get(
        &self,
        coordinates: Coordinates,
        unit: TemperatureUnit,
        fetcher: &dyn WeatherFetcher,
    ) -> WeatherLookup {
        let state = self.store.load().unwrap_or_else(|e| {
            log_warning!("Failed to read stored weather: {e:#}");
            LauncherState::default()
        });
        let stored = state
            .weather_record
            .as_deref()
            .and_then(WeatherReading::from_record);

        if let Some(reading) = stored
            && reading.unit == unit
            && self.is_fresh(state.weather_captured_at)
        {
            return WeatherLookup::Cached(reading);
        }

        match fetcher.fetch(coordinates, unit) {
            Ok(reading) => {
                let reading = WeatherReading { unit, ..reading };
                self.persist(&reading);
                WeatherLookup::Fresh(reading)
            }
            Err(e) => {
                log_warning!("Weather fetch failed: {e:#}");
                stored.map_or(WeatherLookup::Unavailable, WeatherLookup::Fallback)
            }
        }
    }

    fn persist(&self, reading: &WeatherReading) {
        let record = reading.to_record();
        let captured_at = self.clock.now().timestamp_millis();
        let result = self.store.update(&mut |state| {
            state.weather_record = Some(record.clone());
            state.weather_captured_at = Some(captured_at);
        });
        if let Err(e) = result {
            log_warning!("Failed to store weather reading: {e:#}");
        }
    }

    /// One-line status for the launcher's weather widget.
    pub fn display_text(
        &self,
        coordinates: Option<Coordinates>,
        unit: TemperatureUnit,
        fetcher: &dyn WeatherFetcher,
    ) -> String {
        let Some(coordinates) = coordinates else {
            return "Location required".to_string();
        };
        match self.get(coordinates, unit, fetcher).reading() {
            Some(reading) => reading.to_string(),
            None => "Weather unavailable".to_string(),
        }
    }
}
