//! Background re-evaluation of the dark-mode schedule.
//!
//! [`ScheduleMonitor`] owns one worker thread while polling. Each tick reads the
//! shared schedule and the clock, evaluates the policy and compares the result with
//! the previous tick. Only changes are delivered to subscribers; the very first
//! evaluation establishes the baseline without notifying anyone.
//!
//! The worker waits on a stop channel between ticks, so `stop` interrupts a long
//! interval immediately. With a simulated clock the wait is the clock's own sleep,
//! which advances simulated time, and the loop ends on its own once the simulation
//! reaches its end instant.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use super::{SharedSchedule, is_dark_at};
use crate::time_source::TimeSource;

/// Notification delivered to monitor subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ScheduleEvent {
    /// The evaluated dark-mode value differs from the previous tick.
    DarkModeChanged { dark: bool },
}

impl ScheduleEvent {
    pub fn dark_mode_changed(dark: bool) -> Self {
        ScheduleEvent::DarkModeChanged { dark }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Polling,
}

/// Remembers the last evaluated value and reports transitions.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    last: Option<bool>,
}

impl ChangeTracker {
    /// Record `value`, returning it only if it differs from a previous observation.
    pub fn observe(&mut self, value: bool) -> Option<bool> {
        let previous = self.last.replace(value);
        match previous {
            Some(previous) if previous != value => Some(value),
            _ => None,
        }
    }
}

type Subscribers = Arc<Mutex<Vec<Sender<ScheduleEvent>>>>;

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Polling task that reports dark-mode transitions.
pub struct ScheduleMonitor {
    schedule: SharedSchedule,
    clock: Arc<dyn TimeSource>,
    interval: Duration,
    subscribers: Subscribers,
    worker: Option<Worker>,
}

impl ScheduleMonitor {
    pub fn new(schedule: SharedSchedule, clock: Arc<dyn TimeSource>, interval: Duration) -> Self {
        Self {
            schedule,
            clock,
            interval,
            subscribers: Arc::new(Mutex::new(Vec::new())),
            worker: None,
        }
    }

    /// Register a new subscriber. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Receiver<ScheduleEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    pub fn state(&self) -> MonitorState {
        match &self.worker {
            Some(worker) if !worker.handle.is_finished() => MonitorState::Polling,
            _ => MonitorState::Idle,
        }
    }

    /// Start polling. Does nothing if the worker is already running.
    pub fn start(&mut self) {
        if self.state() == MonitorState::Polling {
            return;
        }
        // Reap a worker that ended by itself (finished simulation).
        self.stop();

        let (stop_tx, stop_rx) = mpsc::channel();
        let schedule = Arc::clone(&self.schedule);
        let clock = Arc::clone(&self.clock);
        let subscribers = Arc::clone(&self.subscribers);
        let interval = self.interval;

        let handle = std::thread::spawn(move || {
            run_loop(&schedule, clock.as_ref(), interval, &subscribers, &stop_rx);
        });

        self.worker = Some(Worker { stop_tx, handle });
    }

    /// Stop polling and wait for the worker to exit. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            if worker.handle.join().is_err() {
                log_warning!("Schedule monitor thread panicked");
            }
        }
    }

    /// Block until the worker exits on its own (end of a simulation) or is stopped.
    pub fn wait(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.handle.join();
        }
    }
}

impl Drop for ScheduleMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    schedule: &SharedSchedule,
    clock: &dyn TimeSource,
    interval: Duration,
    subscribers: &Subscribers,
    stop_rx: &Receiver<()>,
) {
    let mut tracker = ChangeTracker::default();

    loop {
        let config = *schedule.read().unwrap_or_else(PoisonError::into_inner);
        let now = clock.now();
        let dark = is_dark_at(&config, &now);

        if let Some(dark) = tracker.observe(dark) {
            log_block_start!(
                "Dark mode {} at {}",
                if dark { "enabled" } else { "disabled" },
                now.format("%H:%M")
            );
            notify(subscribers, ScheduleEvent::dark_mode_changed(dark));
        }

        if clock.is_simulated() {
            clock.sleep(interval);
            match stop_rx.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }
            if clock.is_ended() {
                break;
            }
        } else {
            match stop_rx.recv_timeout(interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }
}

fn notify(subscribers: &Subscribers, event: ScheduleEvent) {
    subscribers
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .retain(|tx| tx.send(event).is_ok());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_is_silent() {
        let mut tracker = ChangeTracker::default();
        assert_eq!(tracker.observe(true), None);
        assert_eq!(tracker.observe(true), None);
        assert_eq!(tracker.observe(false), Some(false));
        assert_eq!(tracker.observe(false), None);
        assert_eq!(tracker.observe(true), Some(true));
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&ScheduleEvent::dark_mode_changed(true)).unwrap();
        assert_eq!(json, r#"{"event_type":"dark_mode_changed","dark":true}"#);

        let back: ScheduleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ScheduleEvent::DarkModeChanged { dark: true });
    }
}
