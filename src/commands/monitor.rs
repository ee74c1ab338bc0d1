//! `horizon monitor`: report dark-mode transitions until interrupted.
//!
//! The schedule is re-read whenever horizon.toml or geo.toml changes and on
//! SIGUSR2. With `--json` the regular output is silenced and every transition is
//! printed as one JSON object per line.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::config::{self, watcher::reload_schedule};
use crate::logger::Log;
use crate::schedule::{
    MonitorState, ScheduleEvent, ScheduleMonitor, SharedSchedule, is_dark_at, shared_schedule,
};
use crate::signals::{SignalMessage, SignalState, setup_signal_handler};
use crate::time_source;

/// How often the command loop checks for signals and events.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn handle_monitor_command(json: bool, debug_enabled: bool) -> Result<()> {
    if json {
        Log::set_enabled(false);
    } else {
        log_version!();
    }

    let config = config::load()?;
    if debug_enabled {
        config.log_config();
    }
    let config_path = config::get_config_path()?;
    let schedule = shared_schedule(config.schedule()?);
    let signal_state = setup_signal_handler(debug_enabled)?;

    // Hot reload is a convenience; the monitor runs without it.
    let _watcher =
        match config::start_config_watcher(config_path.clone(), schedule.clone(), debug_enabled) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                log_pipe!();
                log_warning!("Configuration changes will not be picked up: {e:#}");
                None
            }
        };

    let clock = time_source::shared();
    let current = *schedule
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    log_block_start!("Schedule: {}", current.describe());
    log_indented!(
        "Dark mode is currently {}",
        if is_dark_at(&current, &clock.now()) { "on" } else { "off" }
    );
    log_indented!("Checking every {} seconds", config.poll_interval().as_secs());

    let mut monitor = ScheduleMonitor::new(schedule.clone(), clock, config.poll_interval());
    let events = monitor.subscribe();
    let transitions = run_monitor_loop(&mut monitor, &events, &signal_state, json, || {
        reload(&config_path, &schedule)
    })?;

    if debug_enabled {
        log_pipe!();
        log_debug!("{transitions} transition(s) reported");
    }
    log_end!();
    Ok(())
}

pub(crate) fn reload(config_path: &Path, schedule: &SharedSchedule) {
    if let Err(e) = reload_schedule(config_path, schedule) {
        log_pipe!();
        log_warning!("Keeping current schedule: {e:#}");
    }
}

/// Run `monitor` until a shutdown signal arrives or its worker ends by itself.
///
/// Returns the number of transitions received.
pub(crate) fn run_monitor_loop(
    monitor: &mut ScheduleMonitor,
    events: &Receiver<ScheduleEvent>,
    signal_state: &SignalState,
    json: bool,
    on_reload: impl Fn(),
) -> Result<usize> {
    let mut transitions = 0;
    monitor.start();

    while signal_state.is_running() {
        match signal_state.signal_receiver.recv_timeout(EVENT_POLL_INTERVAL) {
            Ok(SignalMessage::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(SignalMessage::Reload) => on_reload(),
            Err(RecvTimeoutError::Timeout) => {}
        }

        for event in events.try_iter() {
            report(&event, json)?;
            transitions += 1;
        }

        if monitor.state() == MonitorState::Idle {
            break;
        }
    }

    monitor.stop();
    for event in events.try_iter() {
        report(&event, json)?;
        transitions += 1;
    }
    Ok(transitions)
}

/// The worker logs transitions itself, so only JSON output needs work here.
fn report(event: &ScheduleEvent, json: bool) -> Result<()> {
    if json {
        let line = serde_json::to_string(event).context("Failed to serialize event")?;
        println!("{line}");
    }
    Ok(())
}
