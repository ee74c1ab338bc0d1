//! `horizon dark`: report the dark-mode decision or set the manual value.

use anyhow::Result;

use crate::config::{self, builder::update_setting};
use crate::schedule::{ScheduleConfig, is_dark_at};
use crate::time_source;

pub fn handle_dark_command(value: Option<bool>, debug_enabled: bool) -> Result<()> {
    log_version!();

    if let Some(dark) = value {
        // Loading first creates the file if needed and rejects a broken one.
        config::load()?;
        update_setting("dark_mode", &dark.to_string())?;
        log_block_start!("Manual dark mode set to {}", if dark { "on" } else { "off" });
    }

    let config = config::load()?;
    if debug_enabled {
        config.log_config();
    }
    let schedule = config.schedule()?;
    let now = time_source::now();
    let dark = is_dark_at(&schedule, &now);

    log_block_start!("Dark mode is {} at {}", if dark { "on" } else { "off" }, now.format("%H:%M"));
    log_indented!("Schedule: {}", schedule.describe());
    if value.is_some() && !matches!(schedule, ScheduleConfig::Manual { .. }) {
        log_pipe!();
        log_info!("The manual value only applies with schedule_mode = \"manual\"");
        log_indented!("or with \"sun\" while no location is configured");
    }
    log_end!();
    Ok(())
}
