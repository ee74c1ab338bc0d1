//! Hot reload of the dark-mode schedule.
//!
//! Watches horizon.toml and geo.toml and, when either changes, reloads the
//! configuration and swaps the new schedule into the [`SharedSchedule`] read by
//! the scheduling monitor. A configuration that fails to load leaves the current
//! schedule in place.

use anyhow::{Context, Result};
use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::path::{Path, PathBuf};
use std::sync::PoisonError;
use std::thread;
use std::time::{Duration, Instant};

use super::{Config, load_from_path};
use crate::constants::{CONFIG_FILE_NAME, GEO_FILE_NAME};
use crate::schedule::SharedSchedule;
use crate::utils::private_path;

/// Editors often write a file in several steps; events closer together than this
/// trigger one reload.
const DEBOUNCE_MS: u64 = 500;

/// Keeps the underlying watcher alive. Watching stops when this is dropped.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

/// Whether a file event concerns horizon.toml or geo.toml in `config_dir`.
fn affects_config(event: &Event, config_dir: &Path) -> bool {
    event.paths.iter().any(|path| {
        path.parent() == Some(config_dir)
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name == CONFIG_FILE_NAME || name == GEO_FILE_NAME)
    })
}

/// Reload the configuration at `config_path` into `schedule`.
pub fn reload_schedule(config_path: &Path, schedule: &SharedSchedule) -> Result<Config> {
    let config = load_from_path(config_path)?;
    let updated = config.schedule()?;

    let mut current = schedule.write().unwrap_or_else(PoisonError::into_inner);
    if *current != updated {
        log_block_start!("Schedule changed: {}", updated.describe());
        *current = updated;
    }
    Ok(config)
}

/// Start watching the configuration at `config_path`.
pub fn start_config_watcher(
    config_path: PathBuf,
    schedule: SharedSchedule,
    debug_enabled: bool,
) -> Result<ConfigWatcher> {
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .context("Config path has no parent directory")?;

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res
                && matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                )
            {
                let _ = tx.send(event);
            }
        },
        NotifyConfig::default(),
    )
    .context("Failed to create file watcher")?;

    // Watching the directory also catches editors that replace the file.
    watcher
        .watch(&config_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch directory: {}", private_path(&config_dir)))?;

    if debug_enabled {
        log_pipe!();
        log_debug!("Watching {} for changes", private_path(&config_dir));
    }

    thread::spawn(move || {
        let mut last_reload: Option<Instant> = None;

        for event in rx {
            if !affects_config(&event, &config_dir) {
                continue;
            }
            if last_reload.is_some_and(|at| at.elapsed() < Duration::from_millis(DEBOUNCE_MS)) {
                continue;
            }
            // Let the writer finish before reading.
            thread::sleep(Duration::from_millis(50));

            if debug_enabled {
                log_pipe!();
                log_info!("Configuration file change detected");
            }
            if let Err(e) = reload_schedule(&config_path, &schedule) {
                log_pipe!();
                log_warning!("Keeping current schedule: {e:#}");
            }
            last_reload = Some(Instant::now());
        }
    });

    Ok(ConfigWatcher { _watcher: watcher })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ScheduleConfig, shared_schedule};
    use std::fs;

    #[test]
    fn test_reload_swaps_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "schedule_mode = \"manual\"\ndark_mode = true\n").unwrap();

        let schedule = shared_schedule(ScheduleConfig::Manual { dark: false });
        reload_schedule(&path, &schedule).unwrap();

        assert_eq!(
            *schedule.read().unwrap(),
            ScheduleConfig::Manual { dark: true }
        );
    }

    #[test]
    fn test_invalid_config_keeps_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "schedule_mode = \"sometimes\"\n").unwrap();

        let schedule = shared_schedule(ScheduleConfig::Manual { dark: true });
        assert!(reload_schedule(&path, &schedule).is_err());
        assert_eq!(
            *schedule.read().unwrap(),
            ScheduleConfig::Manual { dark: true }
        );
    }

    #[test]
    fn test_affects_config_filters_other_files() {
        let dir = PathBuf::from("/home/user/.config/horizon");
        let event = |name: &str| Event::new(EventKind::Any).add_path(dir.join(name));

        assert!(affects_config(&event("horizon.toml"), &dir));
        assert!(affects_config(&event("geo.toml"), &dir));
        assert!(!affects_config(&event("horizon.toml.swp"), &dir));
    }
}
