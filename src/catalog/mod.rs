//! Installed application catalog.
//!
//! ## Module Structure
//!
//! - [`cache`]: time-boxed snapshot of the catalog plus favorites reconciliation
//! - [`favorites`]: favorites and label override management
//! - [`desktop`]: application discovery from freedesktop `.desktop` files
//!
//! The catalog is built from an [`AppSource`], which lists installed applications
//! and resolves their display metadata. Enumeration is the expensive part, so the
//! cache keeps a snapshot for a configurable freshness window.

pub mod cache;
pub mod desktop;
pub mod favorites;

pub use cache::{AppCatalogCache, resolve_label};
pub use desktop::DesktopEntrySource;

use anyhow::Result;
use chrono::{DateTime, Local};
use std::fmt;
use std::str::FromStr;

/// Identifier of a launchable entry point: package plus activity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppId {
    pub package: String,
    pub activity: String,
}

impl AppId {
    pub fn new(package: impl Into<String>, activity: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            activity: activity.into(),
        }
    }
}

impl FromStr for AppId {
    type Err = anyhow::Error;

    /// Parse `package/activity`, splitting at the first `/`.
    fn from_str(s: &str) -> Result<Self> {
        let Some((package, activity)) = s.split_once('/') else {
            anyhow::bail!("invalid application id '{s}', expected package/activity");
        };
        if package.is_empty() {
            anyhow::bail!("invalid application id '{s}', package is empty");
        }
        Ok(Self::new(package, activity))
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.activity)
    }
}

/// Display metadata for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedApp {
    pub label: String,
    pub icon: Option<String>,
}

/// One launchable entry in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: AppId,
    /// Label reported by the system.
    pub label: String,
    /// Label chosen by the user, if any.
    pub custom_label: Option<String>,
    pub icon: Option<String>,
}

impl CatalogEntry {
    /// The label to show: the override when present, the system label otherwise.
    pub fn display_label(&self) -> &str {
        self.custom_label.as_deref().unwrap_or(&self.label)
    }
}

/// Entries ordered by case-insensitive label, with the time they were captured.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    pub entries: Vec<CatalogEntry>,
    pub captured_at: DateTime<Local>,
}

impl CatalogSnapshot {
    pub fn get(&self, id: &AppId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn contains(&self, id: &AppId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The installed-application registry.
#[cfg_attr(test, mockall::automock)]
pub trait AppSource: Send + Sync {
    /// List every launchable entry point.
    fn enumerate(&self) -> Result<Vec<AppId>>;

    /// Label and icon for one entry point.
    fn resolve(&self, id: &AppId) -> Result<ResolvedApp>;
}
