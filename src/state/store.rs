//! Settings store implementations.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::LauncherState;

/// Persistent key-value settings used by the caches.
///
/// `update` must apply the closure to the latest state and persist the result as one
/// atomic step: concurrent updates never lose each other's writes.
pub trait SettingsStore: Send + Sync {
    /// A consistent snapshot of the persisted state.
    fn load(&self) -> Result<LauncherState>;

    /// Atomic read-modify-write.
    fn update(&self, apply: &mut dyn FnMut(&mut LauncherState)) -> Result<()>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<LauncherState>,
}

impl MemoryStore {
    pub fn new(state: LauncherState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<LauncherState> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn update(&self, apply: &mut dyn FnMut(&mut LauncherState)) -> Result<()> {
        apply(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner));
        Ok(())
    }
}

/// TOML file store.
///
/// Updates hold an exclusive `fs2` lock on a sibling `.lock` file for the whole
/// read-modify-write and replace the state file through a temp file rename, so
/// readers never observe a half-written file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location for the active configuration directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(super::get_state_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn read_state(&self) -> LauncherState {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return LauncherState::default();
            }
            Err(e) => {
                log_warning!("Could not read {}: {e}", self.path.display());
                return LauncherState::default();
            }
        };

        match toml::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                log_warning!(
                    "Ignoring unreadable state file {}: {e}",
                    self.path.display()
                );
                LauncherState::default()
            }
        }
    }

    fn write_state(&self, state: &LauncherState) -> Result<()> {
        let dir = self
            .path
            .parent()
            .context("State file path has no parent directory")?;
        let content = toml::to_string_pretty(state).context("Failed to serialize state")?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path)
            .with_context(|| format!("Failed to write state to {}", self.path.display()))?;
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Result<LauncherState> {
        Ok(self.read_state())
    }

    fn update(&self, apply: &mut dyn FnMut(&mut LauncherState)) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory {}", dir.display()))?;
        }

        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?;
        lock_file
            .lock_exclusive()
            .context("Failed to lock state file")?;

        let mut state = self.read_state();
        apply(&mut state);
        let result = self.write_state(&state);

        let _ = FileExt::unlock(&lock_file);
        result
    }
}
