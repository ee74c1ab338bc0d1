//! `horizon favorites`: show or edit the favorites list.

use anyhow::Result;

use super::{Launcher, parse_app_id};
use crate::args::FavoritesOperation;
use crate::catalog::favorites::{add_favorite, move_favorite, remove_favorite};
use crate::catalog::{AppCatalogCache, CatalogEntry};
use crate::state::SettingsStore;

pub fn handle_favorites_command(operation: FavoritesOperation, debug_enabled: bool) -> Result<()> {
    log_version!();
    let launcher = Launcher::load(debug_enabled)?;
    let max = launcher.config.favorite_limit();
    let catalog = launcher.catalog();

    let favorites = apply_operation(operation, &catalog, launcher.store.as_ref(), max)?;
    if favorites.is_empty() {
        log_block_start!("No favorites yet");
        log_indented!("Add one with: horizon favorites add <package/activity>");
    } else {
        log_block_start!("Favorites ({}/{max}):", favorites.len());
        for (index, entry) in favorites.iter().enumerate() {
            log_indented!("{}. {} ({})", index + 1, entry.display_label(), entry.id);
        }
    }
    log_end!();
    Ok(())
}

/// Apply `operation` and return the resulting favorites, reading the catalog
/// through the one `catalog` for the whole command.
pub(crate) fn apply_operation(
    operation: FavoritesOperation,
    catalog: &AppCatalogCache,
    store: &dyn SettingsStore,
    max: usize,
) -> Result<Vec<CatalogEntry>> {
    match operation {
        FavoritesOperation::List => {}
        FavoritesOperation::Add(text) => {
            let id = parse_app_id(&text)?;
            // Only installed applications can become favorites.
            if !catalog.contains(&id) {
                anyhow::bail!("{id} is not an installed application");
            }
            add_favorite(store, &id, max)?;
            log_block_start!("Added {id} to favorites");
        }
        FavoritesOperation::Remove(text) => {
            let id = parse_app_id(&text)?;
            remove_favorite(store, &id)?;
            log_block_start!("Removed {id} from favorites");
        }
        FavoritesOperation::Move { id, position } => {
            let id = parse_app_id(&id)?;
            move_favorite(store, &id, position)?;
            log_block_start!("Moved {id} to position {}", position + 1);
        }
    }

    catalog.favorites(store, max)
}
