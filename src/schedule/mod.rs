//! Dark-mode scheduling.
//!
//! ## Module Structure
//!
//! - [`policy`]: pure decision of whether dark mode is active at a given minute
//! - [`monitor`]: background task that re-evaluates the policy and reports transitions
//!
//! The schedule itself is a small tagged union built from configuration. It is shared
//! with the monitor through [`SharedSchedule`] so a configuration reload can swap it
//! without restarting the worker.

pub mod monitor;
pub mod policy;

pub use monitor::{MonitorState, ScheduleEvent, ScheduleMonitor};
pub use policy::{DayContext, is_dark_active, is_dark_at};

use anyhow::{Context, Result};
use chrono::{NaiveTime, Timelike};
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::constants::LAST_MINUTE_OF_DAY;
use crate::geo::Coordinates;

/// A wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Build from minutes after midnight, clamped to 23:59.
    pub fn from_minutes(minutes: u16) -> Self {
        Self(minutes.min(LAST_MINUTE_OF_DAY))
    }

    /// Parse `"HH:MM"`.
    pub fn parse(text: &str) -> Result<Self> {
        let time = NaiveTime::parse_from_str(text.trim(), "%H:%M")
            .with_context(|| format!("invalid time '{text}', expected HH:MM"))?;
        Ok(Self::of(&time))
    }

    /// Minute of day of any chrono time value.
    pub fn of<T: Timelike>(time: &T) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// How the dark theme is scheduled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduleConfig {
    /// The stored value, never changes on its own.
    Manual { dark: bool },
    /// Light between `start` and `end`, dark otherwise.
    FixedWindow { start: ClockTime, end: ClockTime },
    /// Dark between sunset and sunrise. Without coordinates the stored value applies.
    SunRelative {
        coordinates: Option<Coordinates>,
        fallback_dark: bool,
    },
}

impl ScheduleConfig {
    /// Short human-readable description used by the CLI and logs.
    pub fn describe(&self) -> String {
        match self {
            ScheduleConfig::Manual { dark } => {
                format!("Manual ({})", if *dark { "dark" } else { "light" })
            }
            ScheduleConfig::FixedWindow { start, end } => format!("Fixed window ({start}-{end})"),
            ScheduleConfig::SunRelative {
                coordinates: Some(coordinates),
                ..
            } => format!("Sunrise/sunset at {coordinates}"),
            ScheduleConfig::SunRelative {
                coordinates: None,
                fallback_dark,
            } => format!(
                "Sunrise/sunset without location, using manual ({})",
                if *fallback_dark { "dark" } else { "light" }
            ),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig::Manual { dark: false }
    }
}

/// Schedule shared between the monitor and the configuration watcher.
pub type SharedSchedule = Arc<RwLock<ScheduleConfig>>;

pub fn shared_schedule(config: ScheduleConfig) -> SharedSchedule {
    Arc::new(RwLock::new(config))
}
