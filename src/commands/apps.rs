//! `horizon apps`: list the application catalog.

use anyhow::Result;

use super::Launcher;
use crate::catalog::CatalogEntry;

pub fn handle_apps_command(reload: bool, debug_enabled: bool) -> Result<()> {
    log_version!();
    let launcher = Launcher::load(debug_enabled)?;
    let catalog = launcher.catalog();

    let apps = catalog.labeled_apps(launcher.store.as_ref(), reload)?;
    if apps.is_empty() {
        log_block_start!("No applications found");
        log_end!();
        return Ok(());
    }

    log_block_start!("{} applications", apps.len());
    for line in format_entries(&apps) {
        log_indented!("{}", line);
    }
    log_end!();
    Ok(())
}

/// One aligned `label  package/activity` line per entry. Overrides are marked with `*`.
pub(crate) fn format_entries(entries: &[CatalogEntry]) -> Vec<String> {
    let width = entries
        .iter()
        .map(|entry| entry.display_label().chars().count())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|entry| {
            let marker = if entry.custom_label.is_some() { "*" } else { " " };
            format!(
                "{:<width$}{marker} {}",
                entry.display_label(),
                entry.id,
                width = width
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AppId;

    fn entry(label: &str, custom: Option<&str>, id: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.parse::<AppId>().unwrap(),
            label: label.to_string(),
            custom_label: custom.map(str::to_string),
            icon: None,
        }
    }

    #[test]
    fn test_format_entries_aligns_ids() {
        let lines = format_entries(&[
            entry("Files", None, "nautilus/nautilus"),
            entry("GIMP", Some("Image Editor"), "gimp/gimp-2.10"),
        ]);
        assert_eq!(
            lines,
            vec![
                "Files         nautilus/nautilus".to_string(),
                "Image Editor* gimp/gimp-2.10".to_string(),
            ]
        );
    }
}
