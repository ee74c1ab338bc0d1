//! `horizon label`: set or clear a label override.

use anyhow::Result;

use super::{Launcher, parse_app_id};
use crate::catalog::favorites::{clear_label, set_label};

pub fn handle_label_command(id: &str, text: Option<&str>, debug_enabled: bool) -> Result<()> {
    log_version!();
    let launcher = Launcher::load(debug_enabled)?;
    let id = parse_app_id(id)?;
    let store = launcher.store.as_ref();

    match text.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => {
            set_label(store, &id, text)?;
            log_block_start!("{id} is now shown as \"{text}\"");
        }
        None => {
            clear_label(store, &id)?;
            log_block_start!("Cleared the label of {id}");
        }
    }

    if !launcher.catalog().contains(&id) {
        log_pipe!();
        log_warning!("{id} is not currently installed");
    }
    log_end!();
    Ok(())
}
