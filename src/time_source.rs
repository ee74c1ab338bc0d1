//! Clock abstraction for real and simulated time.
//!
//! Caches and the scheduling monitor read wall-clock time through [`TimeSource`]
//! so that freshness windows and schedule transitions can be exercised without
//! waiting for real time to pass. The process-wide source defaults to the system
//! clock; `horizon simulate` installs a [`SimulatedTimeSource`] instead.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration as StdDuration, Instant};

static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Source of wall-clock time.
pub trait TimeSource: Send + Sync {
    /// Current local time.
    fn now(&self) -> DateTime<Local>;

    /// Sleep for `duration` (or advance simulated time by it).
    fn sleep(&self, duration: StdDuration);

    /// Whether this clock is simulated.
    fn is_simulated(&self) -> bool;

    /// Whether a simulation has reached its end. Always false for real time.
    fn is_ended(&self) -> bool {
        false
    }
}

/// The system clock.
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated clock running between two instants.
///
/// With a positive multiplier time flows continuously (`60.0` = one simulated minute
/// per real second). A multiplier of `0.0` selects fast-forward: time only moves when
/// someone sleeps, and it jumps by exactly the slept duration.
pub struct SimulatedTimeSource {
    start_time: DateTime<Local>,
    end_time: DateTime<Local>,
    multiplier: f64,
    /// Simulated time consumed by completed sleeps.
    elapsed: Mutex<StdDuration>,
    /// Sleep in progress: real start instant and simulated length.
    in_progress: Mutex<Option<(Instant, StdDuration)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimulatedTimeSource {
    /// Create a simulated clock. Negative multipliers fall back to one hour per second.
    pub fn new(start_time: DateTime<Local>, end_time: DateTime<Local>, multiplier: f64) -> Self {
        let multiplier = if multiplier == 0.0 {
            0.0
        } else if multiplier < 0.0 {
            3600.0
        } else {
            multiplier
        };

        Self {
            start_time,
            end_time,
            multiplier,
            elapsed: Mutex::new(StdDuration::ZERO),
            in_progress: Mutex::new(None),
        }
    }

    /// Whether this clock jumps instead of flowing.
    pub fn is_fast_forward(&self) -> bool {
        self.multiplier == 0.0
    }

    fn current_time(&self) -> DateTime<Local> {
        let mut total = *lock(&self.elapsed);

        if let Some((started, length)) = *lock(&self.in_progress) {
            let progressed = started.elapsed().as_secs_f64() * self.multiplier;
            total += StdDuration::from_secs_f64(progressed.min(length.as_secs_f64()));
        }

        let simulated = self.start_time + to_chrono(total);
        simulated.min(self.end_time)
    }

    fn remaining(&self) -> StdDuration {
        (self.end_time - self.current_time())
            .to_std()
            .unwrap_or(StdDuration::ZERO)
    }
}

fn to_chrono(duration: StdDuration) -> ChronoDuration {
    ChronoDuration::from_std(duration).unwrap_or_else(|_| ChronoDuration::days(36_500))
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        let step = duration.min(self.remaining());
        if step.is_zero() {
            return;
        }

        if self.is_fast_forward() {
            *lock(&self.elapsed) += step;
            // Yield so that other threads (and the log writer) keep up.
            std::thread::sleep(StdDuration::from_millis(1));
            return;
        }

        *lock(&self.in_progress) = Some((Instant::now(), step));
        std::thread::sleep(StdDuration::from_secs_f64(
            step.as_secs_f64() / self.multiplier,
        ));
        *lock(&self.in_progress) = None;
        *lock(&self.elapsed) += step;
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

/// Install the process-wide time source. Only the first call has an effect.
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if a time source has been installed or used yet.
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Handle to the process-wide time source (the system clock unless replaced).
pub fn shared() -> Arc<dyn TimeSource> {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .clone()
}

/// Current time from the process-wide time source.
pub fn now() -> DateTime<Local> {
    shared().now()
}

/// Whether the process-wide time source is simulated.
pub fn is_simulated() -> bool {
    shared().is_simulated()
}

/// Parse `"YYYY-MM-DD HH:MM:SS"` as a local time.
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))?;

    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| "Ambiguous or invalid local time".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Local> {
        parse_datetime(s).unwrap()
    }

    #[test]
    fn test_fast_forward_advances_by_sleep() {
        let clock =
            SimulatedTimeSource::new(at("2026-01-10 05:00:00"), at("2026-01-10 06:00:00"), 0.0);

        assert_eq!(clock.now(), at("2026-01-10 05:00:00"));
        clock.sleep(StdDuration::from_secs(600));
        assert_eq!(clock.now(), at("2026-01-10 05:10:00"));
        assert!(!clock.is_ended());
    }

    #[test]
    fn test_fast_forward_caps_at_end() {
        let clock =
            SimulatedTimeSource::new(at("2026-01-10 05:00:00"), at("2026-01-10 05:30:00"), 0.0);

        clock.sleep(StdDuration::from_secs(3600));
        assert_eq!(clock.now(), at("2026-01-10 05:30:00"));
        assert!(clock.is_ended());

        // Sleeping past the end is a no-op.
        clock.sleep(StdDuration::from_secs(60));
        assert_eq!(clock.now(), at("2026-01-10 05:30:00"));
    }

    #[test]
    fn test_parse_datetime_rejects_bad_format() {
        assert!(parse_datetime("2026-01-10T05:00").is_err());
        assert!(parse_datetime("2026-01-10 05:00:00").is_ok());
    }
}
