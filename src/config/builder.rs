//! Default configuration creation and in-place updates.
//!
//! New files are produced by [`ConfigBuilder`], which lines up the trailing
//! comments of every setting. Updates to an existing file only touch the value of
//! one key and keep the user's comments and spacing.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::get_config_path;
use crate::constants::*;
use crate::utils::private_path;

/// Write a commented default configuration to `path`.
///
/// Coordinates are left commented out unless a geo.toml already sits next to the
/// new file, in which case the location section points there.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let has_geo_file = path
        .parent()
        .is_some_and(|dir| dir.join(GEO_FILE_NAME).exists());

    let builder = ConfigBuilder::new()
        .add_section("Dark mode schedule")
        .add_setting(
            "schedule_mode",
            &format!("\"{DEFAULT_SCHEDULE_MODE}\""),
            "\"manual\", \"fixed\" or \"sun\"",
        )
        .add_setting(
            "dark_mode",
            &DEFAULT_DARK_MODE.to_string(),
            "Manual value, also used by \"sun\" without a location",
        )
        .add_setting(
            "window_start",
            &format!("\"{DEFAULT_WINDOW_START}\""),
            "Light period start for \"fixed\" (HH:MM)",
        )
        .add_setting(
            "window_end",
            &format!("\"{DEFAULT_WINDOW_END}\""),
            "Light period end for \"fixed\" (HH:MM)",
        )
        .add_setting(
            "poll_interval",
            &DEFAULT_POLL_INTERVAL.to_string(),
            &format!(
                "Seconds between schedule checks ({MINIMUM_POLL_INTERVAL}-{MAXIMUM_POLL_INTERVAL})"
            ),
        )
        .add_section("Applications")
        .add_setting(
            "favorite_count",
            &DEFAULT_FAVORITE_COUNT.to_string(),
            &format!(
                "Number of favorite slots ({MINIMUM_FAVORITE_COUNT}-{MAXIMUM_FAVORITE_COUNT})"
            ),
        )
        .add_setting(
            "catalog_freshness",
            &DEFAULT_CATALOG_FRESHNESS.to_string(),
            &format!(
                "Seconds before the app list is rebuilt ({MINIMUM_CATALOG_FRESHNESS}-{MAXIMUM_CATALOG_FRESHNESS})"
            ),
        )
        .add_section("Weather")
        .add_setting(
            "use_celsius",
            &DEFAULT_USE_CELSIUS.to_string(),
            "Celsius instead of Fahrenheit",
        )
        .add_setting(
            "weather_freshness",
            &DEFAULT_WEATHER_FRESHNESS.to_string(),
            &format!(
                "Minutes before weather is fetched again ({MINIMUM_WEATHER_FRESHNESS}-{MAXIMUM_WEATHER_FRESHNESS})"
            ),
        )
        .add_section("Location");

    let builder = if has_geo_file {
        builder.add_comment("Coordinates are read from geo.toml")
    } else {
        builder
            .add_comment("latitude = 51.500000")
            .add_comment("longitude = -0.120000")
    };

    fs::write(path, builder.build()).context("Failed to write default config file")?;
    Ok(())
}

/// Change the value of `key` in the active configuration file.
///
/// `value` is written verbatim, so strings must carry their quotes. A key that is
/// not present yet is appended.
pub fn update_setting(key: &str, value: &str) -> Result<()> {
    let config_path = get_config_path()?;
    update_setting_in(&config_path, key, value)
}

pub(crate) fn update_setting_in(config_path: &Path, key: &str, value: &str) -> Result<()> {
    if !config_path.exists() {
        anyhow::bail!("No config file found at {}", private_path(config_path));
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config from {}", private_path(config_path)))?;

    let updated = match find_config_line(&content, key) {
        Some(line) => content.replacen(&line, &preserve_comment_formatting(&line, key, value), 1),
        None => {
            let mut updated = content;
            if !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(&format!("{key} = {value}\n"));
            updated
        }
    };

    fs::write(config_path, updated).with_context(|| {
        format!(
            "Failed to write updated config to {}",
            private_path(config_path)
        )
    })
}

struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
    Comment(String),
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn add_comment(mut self, text: &str) -> Self {
        self.entries.push(ConfigEntry::Comment(format!("# {text}")));
        self
    }

    fn build(self) -> String {
        // One space between the longest setting and its comment.
        let width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !lines.is_empty() {
                        lines.push(String::new());
                    }
                    lines.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    lines.push(format!("{line:<width$}{comment}"));
                }
                ConfigEntry::Comment(text) => lines.push(text),
            }
        }

        let mut result = lines.join("\n");
        result.push('\n');
        result
    }
}

/// First non-comment line assigning `key`.
pub(crate) fn find_config_line(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .find(|line| {
            let trimmed = line.trim_start();
            !trimmed.starts_with('#')
                && trimmed
                    .strip_prefix(key)
                    .is_some_and(|rest| rest.trim_start().starts_with('='))
        })
        .map(str::to_string)
}

/// Replace the value of a `key = value  # comment` line, keeping the spacing
/// before the comment.
pub(crate) fn preserve_comment_formatting(original_line: &str, key: &str, new_value: &str) -> String {
    let key_value_part = format!("{key} = {new_value}");

    let Some(comment_pos) = original_line.find('#') else {
        return key_value_part;
    };
    let comment_part = &original_line[comment_pos..];
    let before_comment = &original_line[..comment_pos];
    let spacing = match before_comment.rfind(|c: char| !c.is_whitespace()) {
        Some(last) => &before_comment[last + 1..],
        None => " ",
    };

    format!("{key_value_part}{spacing}{comment_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_aligns_comments() {
        let text = ConfigBuilder::new()
            .add_section("A")
            .add_setting("x", "1", "short")
            .add_setting("longer_key", "\"value\"", "long")
            .add_section("B")
            .add_comment("latitude = 1.0")
            .build();

        assert_eq!(
            text,
            "#[A]\n\
             x = 1                # short\n\
             longer_key = \"value\" # long\n\
             \n\
             #[B]\n\
             # latitude = 1.0\n"
        );
    }

    #[test]
    fn test_find_config_line_skips_comments_and_prefixes() {
        let content = "# dark_mode = true\ndark_mode_extra = 1\ndark_mode = false  # manual\n";
        assert_eq!(
            find_config_line(content, "dark_mode").as_deref(),
            Some("dark_mode = false  # manual")
        );
        assert_eq!(find_config_line(content, "latitude"), None);
    }

    #[test]
    fn test_preserve_comment_formatting() {
        assert_eq!(
            preserve_comment_formatting("dark_mode = false\t# manual", "dark_mode", "true"),
            "dark_mode = true\t# manual"
        );
        assert_eq!(
            preserve_comment_formatting("dark_mode = false", "dark_mode", "true"),
            "dark_mode = true"
        );
    }

    #[test]
    fn test_update_setting_in_place_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("horizon.toml");
        create_default_config(&path).unwrap();

        update_setting_in(&path, "dark_mode", "true").unwrap();
        update_setting_in(&path, "latitude", "10.0").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("dark_mode = true "));
        assert!(content.ends_with("latitude = 10.0\n"));

        let config: crate::config::Config = toml::from_str(&content).unwrap();
        assert_eq!(config.dark_mode, Some(true));
    }
}
