//! Small helpers shared across modules.

use std::path::Path;

/// Display form of `path` with the home directory replaced by `~`.
///
/// Used for every path that ends up in log output.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.display());
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_private_path_hides_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(
            private_path(&home.join(".config/horizon/horizon.toml")),
            "~/.config/horizon/horizon.toml"
        );
        assert_eq!(private_path(&home), "~");
    }

    #[test]
    fn test_private_path_keeps_other_paths() {
        let path = PathBuf::from("/etc/xdg/horizon.toml");
        if dirs::home_dir().is_some_and(|home| path.starts_with(home)) {
            return;
        }
        assert_eq!(private_path(&path), "/etc/xdg/horizon.toml");
    }
}
