//! Application discovery from freedesktop `.desktop` files.
//!
//! Applications are looked up in `$XDG_DATA_HOME/applications` followed by each
//! `$XDG_DATA_DIRS/applications`. A file id found in an earlier directory shadows
//! the same id further down the list, which is how user overrides of system entries
//! work. Only the top level of each directory is scanned.
//!
//! The id of an entry is the desktop file stem as package and the basename of the
//! `Exec` program as activity, e.g. `org.gnome.Nautilus/nautilus`.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{AppId, AppSource, ResolvedApp};

/// Fields of the `[Desktop Entry]` group that matter to the launcher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DesktopEntry {
    pub name: Option<String>,
    pub exec: Option<String>,
    pub icon: Option<String>,
    pub hidden: bool,
}

impl DesktopEntry {
    /// Program name of the `Exec` line without path, arguments or field codes.
    pub fn program(&self) -> Option<String> {
        let exec = strip_field_codes(self.exec.as_deref()?);
        let program = exec.split_whitespace().find(|part| !part.contains('='))?;
        let program = program.trim_matches('"');
        Path::new(program)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Parse the `[Desktop Entry]` group of a desktop file.
///
/// Returns `None` for anything that is not a visible application: other entry
/// types, `NoDisplay=true` and `Hidden=true` entries.
pub fn parse_desktop_file(content: &str) -> Option<DesktopEntry> {
    let mut entry = DesktopEntry::default();
    let mut in_desktop_entry = false;
    let mut is_application = false;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') {
            in_desktop_entry = trimmed == "[Desktop Entry]";
            continue;
        }
        if !in_desktop_entry || trimmed.starts_with('#') {
            continue;
        }

        if let Some(value) = strip_key(trimmed, "Name") {
            entry.name = Some(value.to_string());
        } else if let Some(value) = strip_key(trimmed, "Exec") {
            entry.exec = Some(value.to_string());
        } else if let Some(value) = strip_key(trimmed, "Icon") {
            entry.icon = Some(value.to_string()).filter(|icon| !icon.is_empty());
        } else if let Some(value) = strip_key(trimmed, "Type") {
            is_application = value == "Application";
        } else if let Some(value) = strip_key(trimmed, "NoDisplay") {
            entry.hidden |= value == "true";
        } else if let Some(value) = strip_key(trimmed, "Hidden") {
            entry.hidden |= value == "true";
        }
    }

    (is_application && !entry.hidden).then_some(entry)
}

/// Value of `key=value`, ignoring localized variants like `Name[de]=`.
fn strip_key<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(key)?.trim_start();
    rest.strip_prefix('=').map(str::trim)
}

/// Strip freedesktop field codes (`%f`, `%U`, ...) from an Exec value.
fn strip_field_codes(exec: &str) -> String {
    let mut result = String::with_capacity(exec.len());
    let mut chars = exec.chars();
    while let Some(ch) = chars.next() {
        if ch == '%' {
            match chars.next() {
                Some('%') => result.push('%'),
                Some(_) | None => {}
            }
        } else {
            result.push(ch);
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Default application directories in lookup order.
pub fn application_dirs() -> Vec<PathBuf> {
    let data_home = std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")));

    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());

    data_home
        .into_iter()
        .chain(
            data_dirs
                .split(':')
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        )
        .map(|dir| dir.join("applications"))
        .collect()
}

/// [`AppSource`] reading `.desktop` files.
pub struct DesktopEntrySource {
    dirs: Vec<PathBuf>,
    /// Where each id came from during the last enumeration.
    paths: Mutex<HashMap<AppId, PathBuf>>,
}

impl DesktopEntrySource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            paths: Mutex::new(HashMap::new()),
        }
    }

    /// Source over the XDG application directories.
    pub fn from_environment() -> Self {
        Self::new(application_dirs())
    }

    fn read_entry(path: &Path) -> Result<Option<DesktopEntry>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(parse_desktop_file(&content))
    }

    fn desktop_files(dir: &Path) -> Vec<PathBuf> {
        let Ok(read_dir) = fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = read_dir
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "desktop"))
            .collect();
        files.sort();
        files
    }
}

impl AppSource for DesktopEntrySource {
    fn enumerate(&self) -> Result<Vec<AppId>> {
        if !self.dirs.iter().any(|dir| dir.is_dir()) {
            anyhow::bail!("no application directory exists");
        }

        let mut shadowed = std::collections::HashSet::new();
        let mut found = HashMap::new();
        let mut ids = Vec::new();

        for dir in &self.dirs {
            for path in Self::desktop_files(dir) {
                let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned())
                else {
                    continue;
                };
                if !shadowed.insert(stem.clone()) {
                    continue;
                }

                let entry = match Self::read_entry(&path) {
                    Ok(Some(entry)) => entry,
                    Ok(None) => continue,
                    Err(e) => {
                        log_debug!("{e:#}");
                        continue;
                    }
                };
                let Some(program) = entry.program() else {
                    continue;
                };

                let id = AppId::new(stem, program);
                found.insert(id.clone(), path);
                ids.push(id);
            }
        }

        *self.paths.lock().unwrap_or_else(PoisonError::into_inner) = found;
        Ok(ids)
    }

    fn resolve(&self, id: &AppId) -> Result<ResolvedApp> {
        let path = self
            .paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .with_context(|| format!("{id} was not enumerated"))?;

        let entry = Self::read_entry(&path)?
            .with_context(|| format!("{} is no longer a visible application", path.display()))?;
        let label = entry
            .name
            .filter(|name| !name.is_empty())
            .with_context(|| format!("{} has no Name", path.display()))?;

        if let Some(icon) = &entry.icon
            && Path::new(icon).is_absolute()
            && !Path::new(icon).exists()
        {
            anyhow::bail!("icon {icon} of {id} does not exist");
        }

        Ok(ResolvedApp {
            label,
            icon: entry.icon,
        })
    }
}
