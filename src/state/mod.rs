//! Persistent launcher state, following XDG Base Directory standards.
//!
//! Favorites, label overrides and the last weather reading live in
//! `XDG_STATE_HOME/horizon/{namespace}/state.toml`, separate from the user's
//! configuration. All access goes through [`SettingsStore`], which offers a consistent
//! snapshot (`load`) and an atomic read-modify-write (`update`). [`FileStore`] is the
//! on-disk implementation, [`MemoryStore`] serves tests and dry runs.

pub mod store;

pub use store::{FileStore, MemoryStore, SettingsStore};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::AppId;
use crate::config::get_custom_config_dir;
use crate::constants::STATE_FILE_NAME;

/// Everything horizon persists between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherState {
    /// Favorite applications in display order, as `package/activity`.
    pub favorites: Vec<String>,
    /// Last weather reading in record form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_record: Option<String>,
    /// Capture instant of `weather_record` in epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_captured_at: Option<i64>,
    /// User label overrides keyed by `package/activity`.
    pub labels: BTreeMap<String, String>,
}

impl LauncherState {
    /// Parsed favorites in stored order. Malformed entries and repeats of an
    /// earlier entry are skipped.
    pub fn favorite_ids(&self) -> Vec<AppId> {
        let mut ids: Vec<AppId> = Vec::with_capacity(self.favorites.len());
        for id in self.favorites.iter().filter_map(|text| text.parse::<AppId>().ok()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Whether the stored favorites list repeats an entry.
    pub fn has_duplicate_favorites(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        !self.favorites.iter().all(|text| seen.insert(text.as_str()))
    }

    pub fn weather_captured_at(&self) -> Option<DateTime<Local>> {
        self.weather_captured_at
            .and_then(|millis| Local.timestamp_millis_opt(millis).single())
    }
}

/// Get the state directory for a given configuration directory.
///
/// State is stored in XDG_STATE_HOME/horizon/{namespace} where namespace is:
/// - "default" for the default config directory
/// - "custom_<hash>" for custom config directories (via --config)
pub fn get_state_dir(config_dir: Option<&Path>) -> Result<PathBuf> {
    let state_home = std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".local/state")
        });

    let state_base = state_home.join("horizon");

    let namespace = match config_dir {
        None => "default".to_string(),
        Some(path) => {
            let default_config = dirs::config_dir()
                .context("Could not determine config directory")?
                .join("horizon");
            if path == default_config {
                "default".to_string()
            } else {
                get_state_namespace(path)
            }
        }
    };

    Ok(state_base.join(namespace))
}

/// Stable namespace for a custom config directory.
fn get_state_namespace(config_path: &Path) -> String {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());

    let hash = sha256::digest(canonical.to_string_lossy().as_bytes());
    format!("custom_{}", &hash[..16])
}

/// Path of the state file for the active configuration directory.
pub fn get_state_path() -> Result<PathBuf> {
    let config_dir = get_custom_config_dir();
    Ok(get_state_dir(config_dir.as_deref())?.join(STATE_FILE_NAME))
}
