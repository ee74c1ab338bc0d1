//! Time-boxed cache over application enumeration.
//!
//! The cache keeps one immutable [`CatalogSnapshot`] behind an `Arc`. Readers get a
//! clone of the `Arc`, so a refresh that swaps in a new snapshot never disturbs a
//! snapshot somebody is still iterating. The mutex guarding the slot is held for the
//! whole refresh: concurrent callers wait and then see the new snapshot instead of
//! starting enumerations of their own.

use anyhow::Result;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{AppId, AppSource, CatalogEntry, CatalogSnapshot};
use crate::state::SettingsStore;
use crate::time_source::TimeSource;

/// Cached application catalog.
pub struct AppCatalogCache {
    source: Arc<dyn AppSource>,
    clock: Arc<dyn TimeSource>,
    freshness: Duration,
    snapshot: Mutex<Option<Arc<CatalogSnapshot>>>,
}

impl AppCatalogCache {
    pub fn new(source: Arc<dyn AppSource>, clock: Arc<dyn TimeSource>, freshness: Duration) -> Self {
        Self {
            source,
            clock,
            freshness,
            snapshot: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<CatalogSnapshot>>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, snapshot: &CatalogSnapshot) -> bool {
        let age = self.clock.now() - snapshot.captured_at;
        match age.to_std() {
            Ok(age) => age < self.freshness,
            // Captured "in the future": the clock moved backwards.
            Err(_) => false,
        }
    }

    /// All launchable applications.
    ///
    /// Returns the cached snapshot while it is fresh unless `force_reload` is set.
    /// If enumeration fails the result is an empty snapshot and the cached one is
    /// left untouched.
    pub fn get_all(&self, force_reload: bool) -> Arc<CatalogSnapshot> {
        match self.load(force_reload) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log_warning!("Failed to enumerate applications: {e:#}");
                Arc::new(CatalogSnapshot {
                    entries: Vec::new(),
                    captured_at: self.clock.now(),
                })
            }
        }
    }

    fn load(&self, force_reload: bool) -> Result<Arc<CatalogSnapshot>> {
        let mut slot = self.slot();

        if !force_reload
            && let Some(snapshot) = slot.as_ref()
            && self.is_fresh(snapshot)
        {
            return Ok(Arc::clone(snapshot));
        }

        let snapshot = Arc::new(self.build()?);
        *slot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    fn build(&self) -> Result<CatalogSnapshot> {
        let ids = self.source.enumerate()?;
        let mut seen = HashSet::with_capacity(ids.len());
        let mut entries = Vec::with_capacity(ids.len());

        for id in ids {
            if !seen.insert(id.clone()) {
                continue;
            }
            match self.source.resolve(&id) {
                Ok(app) => entries.push(CatalogEntry {
                    id,
                    label: app.label,
                    custom_label: None,
                    icon: app.icon,
                }),
                Err(e) => log_debug!("Skipping {id}: {e:#}"),
            }
        }

        entries.sort_by_cached_key(|entry| entry.label.to_lowercase());

        Ok(CatalogSnapshot {
            entries,
            captured_at: self.clock.now(),
        })
    }

    /// Drop the cached snapshot so the next read enumerates again.
    pub fn invalidate(&self) {
        *self.slot() = None;
    }

    /// Favorite applications in stored order, with label overrides applied.
    ///
    /// Only the first `max` stored favorites are considered. Favorites that are no
    /// longer installed are left out and, together with their label overrides,
    /// removed from the store in a single update, which also drops repeated entries.
    /// Nothing is reconciled when the catalog could not be enumerated.
    pub fn favorites(&self, store: &dyn SettingsStore, max: usize) -> Result<Vec<CatalogEntry>> {
        let snapshot = match self.load(false) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log_warning!("Failed to enumerate applications: {e:#}");
                return Ok(Vec::new());
            }
        };
        let state = store.load()?;

        let mut favorites = Vec::new();
        let mut missing = Vec::new();
        for id in state.favorite_ids().into_iter().take(max) {
            match snapshot.get(&id) {
                Some(entry) => favorites.push(resolve_label(entry, &state.labels)),
                None => missing.push(id.to_string()),
            }
        }

        if !missing.is_empty() || state.has_duplicate_favorites() {
            if !missing.is_empty() {
                log_decorated!("Removing {} uninstalled favorite(s)", missing.len());
            }
            let result = store.update(&mut |state| {
                let mut seen = HashSet::new();
                state
                    .favorites
                    .retain(|text| !missing.contains(text) && seen.insert(text.clone()));
                for text in &missing {
                    state.labels.remove(text);
                }
            });
            if let Err(e) = result {
                log_warning!("Failed to update favorites: {e:#}");
            }
        }

        Ok(favorites)
    }

    /// Every application with label overrides applied, in catalog order.
    pub fn labeled_apps(&self, store: &dyn SettingsStore, force_reload: bool) -> Result<Vec<CatalogEntry>> {
        let snapshot = self.get_all(force_reload);
        let state = store.load()?;
        Ok(snapshot
            .entries
            .iter()
            .map(|entry| resolve_label(entry, &state.labels))
            .collect())
    }

    /// Whether `id` is part of the current catalog.
    pub fn contains(&self, id: &AppId) -> bool {
        self.get_all(false).contains(id)
    }
}

/// Copy of `entry` carrying its label override from `overrides`, if one exists.
pub fn resolve_label(entry: &CatalogEntry, overrides: &BTreeMap<String, String>) -> CatalogEntry {
    let mut resolved = entry.clone();
    resolved.custom_label = overrides
        .get(&entry.id.to_string())
        .filter(|label| !label.is_empty())
        .cloned();
    resolved
}
