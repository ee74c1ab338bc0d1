//! Favorites and label override management.
//!
//! Every operation is one atomic [`SettingsStore::update`], so the favorites list is
//! never observed half-edited. The list never gains duplicates and never grows past
//! the configured favorite count through these functions.

use anyhow::Result;

use super::AppId;
use crate::state::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    AlreadyPresent,
    Full,
    NotFound,
}

/// Append `id` to the favorites.
pub fn add_favorite(store: &dyn SettingsStore, id: &AppId, max: usize) -> Result<()> {
    let key = id.to_string();
    let mut outcome = Outcome::Done;

    store.update(&mut |state| {
        outcome = if state.favorites.contains(&key) {
            Outcome::AlreadyPresent
        } else if state.favorites.len() >= max {
            Outcome::Full
        } else {
            state.favorites.push(key.clone());
            Outcome::Done
        };
    })?;

    match outcome {
        Outcome::AlreadyPresent => anyhow::bail!("{id} is already a favorite"),
        Outcome::Full => anyhow::bail!("favorites are full ({max} max), remove one first"),
        _ => Ok(()),
    }
}

/// Remove `id` from the favorites. Its label override is kept.
pub fn remove_favorite(store: &dyn SettingsStore, id: &AppId) -> Result<()> {
    let key = id.to_string();
    let mut outcome = Outcome::NotFound;

    store.update(&mut |state| {
        let before = state.favorites.len();
        state.favorites.retain(|text| text != &key);
        if state.favorites.len() != before {
            outcome = Outcome::Done;
        }
    })?;

    if outcome == Outcome::NotFound {
        anyhow::bail!("{id} is not a favorite");
    }
    Ok(())
}

/// Move `id` to `position` (0-based, clamped to the end of the list).
pub fn move_favorite(store: &dyn SettingsStore, id: &AppId, position: usize) -> Result<()> {
    let key = id.to_string();
    let mut outcome = Outcome::NotFound;

    store.update(&mut |state| {
        if let Some(index) = state.favorites.iter().position(|text| text == &key) {
            let entry = state.favorites.remove(index);
            let position = position.min(state.favorites.len());
            state.favorites.insert(position, entry);
            outcome = Outcome::Done;
        }
    })?;

    if outcome == Outcome::NotFound {
        anyhow::bail!("{id} is not a favorite");
    }
    Ok(())
}

/// Set the label override of `id`. An empty or blank label clears it.
pub fn set_label(store: &dyn SettingsStore, id: &AppId, label: &str) -> Result<()> {
    let key = id.to_string();
    let label = label.trim();

    store.update(&mut |state| {
        if label.is_empty() {
            state.labels.remove(&key);
        } else {
            state.labels.insert(key.clone(), label.to_string());
        }
    })
}

pub fn clear_label(store: &dyn SettingsStore, id: &AppId) -> Result<()> {
    set_label(store, id, "")
}
