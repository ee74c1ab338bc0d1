//! `horizon simulate`: run the schedule monitor against a simulated clock.
//!
//! Shows every dark-mode transition between two instants without waiting for
//! real time to pass. A multiplier of 0 fast-forwards: each poll interval is
//! skipped instantly.

use anyhow::Result;
use chrono::Local;
use std::sync::Arc;

use super::monitor::{reload, run_monitor_loop};
use crate::config;
use crate::logger::Log;
use crate::schedule::{ScheduleMonitor, is_dark_at, shared_schedule};
use crate::signals::setup_signal_handler;
use crate::time_source::{self, SimulatedTimeSource, TimeSource};

pub fn handle_simulate_command(
    start_time: &str,
    end_time: &str,
    multiplier: f64,
    log_to_file: bool,
    debug_enabled: bool,
) -> Result<()> {
    let start = time_source::parse_datetime(start_time)
        .map_err(|e| anyhow::anyhow!("Invalid start time: {e}"))?;
    let end = time_source::parse_datetime(end_time)
        .map_err(|e| anyhow::anyhow!("Invalid end time: {e}"))?;
    if end <= start {
        anyhow::bail!("End time must be after start time");
    }

    let _log_guard = if log_to_file {
        let log_filename = format!(
            "horizon-simulation-{}.log",
            Local::now().format("%Y%m%d-%H%M%S")
        );
        log_version!();
        log_block_start!("Writing simulation output to {log_filename}");
        log_end!();
        Some(Log::start_file_logging(log_filename)?)
    } else {
        None
    };

    // Installed before any logging so timestamps show simulated time from the start.
    let clock = Arc::new(SimulatedTimeSource::new(start, end, multiplier));
    time_source::init_time_source(clock.clone());

    log_version!();
    log_block_start!("Simulation mode");
    log_decorated!(
        "Simulating from {} to {}",
        start.format("%Y-%m-%d %H:%M:%S"),
        end.format("%Y-%m-%d %H:%M:%S")
    );
    let duration = end - start;
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );
    if clock.is_fast_forward() {
        log_indented!("Time acceleration: fast-forward");
    } else {
        log_indented!(
            "Time acceleration: {multiplier}x (about {:.1} seconds)",
            duration.num_seconds() as f64 / multiplier
        );
    }

    let config = config::load()?;
    if debug_enabled {
        config.log_config();
    }
    let config_path = config::get_config_path()?;
    let schedule = shared_schedule(config.schedule()?);
    let signal_state = setup_signal_handler(debug_enabled)?;

    let initial = *schedule
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    log_block_start!("Schedule: {}", initial.describe());
    log_indented!(
        "Dark mode starts {}",
        if is_dark_at(&initial, &clock.now()) { "on" } else { "off" }
    );

    let mut monitor = ScheduleMonitor::new(schedule.clone(), clock.clone(), config.poll_interval());
    let events = monitor.subscribe();
    let transitions = run_monitor_loop(&mut monitor, &events, &signal_state, false, || {
        reload(&config_path, &schedule)
    })?;

    log_block_start!("Simulation finished at {}", clock.now().format("%Y-%m-%d %H:%M:%S"));
    log_indented!("{transitions} dark-mode transition(s)");
    log_end!();
    Ok(())
}
