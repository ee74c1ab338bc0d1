//! Command handlers for the horizon binary.
//!
//! Each command lives in its own submodule. Handlers load the configuration,
//! build the collaborators they need and report through the logger macros.

pub mod apps;
pub mod dark;
pub mod favorites;
pub mod help;
pub mod label;
pub mod monitor;
pub mod simulate;
pub mod sun;
pub mod weather;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::catalog::{AppCatalogCache, AppId, DesktopEntrySource};
use crate::config::{self, Config};
use crate::state::FileStore;
use crate::time_source;
use crate::utils::private_path;
use crate::weather::WeatherCache;

/// Configuration plus the persistent store, as every command needs them.
pub(crate) struct Launcher {
    pub config: Config,
    pub store: Arc<FileStore>,
}

impl Launcher {
    pub fn load(debug_enabled: bool) -> Result<Self> {
        let config = config::load()?;
        let store = Arc::new(FileStore::open_default()?);

        if debug_enabled {
            config.log_config();
            log_pipe!();
            log_debug!("State file: {}", private_path(store.path()));
        }

        Ok(Self { config, store })
    }

    /// Catalog over the installed `.desktop` files.
    pub fn catalog(&self) -> AppCatalogCache {
        AppCatalogCache::new(
            Arc::new(DesktopEntrySource::from_environment()),
            time_source::shared(),
            self.config.catalog_freshness(),
        )
    }

    pub fn weather(&self) -> WeatherCache {
        WeatherCache::new(
            self.store.clone(),
            time_source::shared(),
            self.config.weather_freshness(),
        )
    }
}

/// Parse an application id given on the command line.
pub(crate) fn parse_app_id(text: &str) -> Result<AppId> {
    text.parse()
        .with_context(|| format!("'{text}' is not an application id (package/activity)"))
}
