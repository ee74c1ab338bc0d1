//! Structured logging with box-drawing output.
//!
//! Every line horizon prints goes through the macros in this module so that the
//! output keeps a single visual shape:
//!
//! ```text
//! ┏ horizon v0.3.0 ━━╸
//! ┃
//! ┣ Loaded default configuration
//! ┃   Schedule: Fixed window (08:00-20:00)
//! ┣[INFO] Dark mode is now on
//! ╹
//! ```
//!
//! ## Conventions
//!
//! - `log_block_start!` opens a new conceptual block (blank pipe line, then `┣ message`).
//! - `log_decorated!` continues a block with `┣ message`.
//! - `log_indented!` prints nested details as `┃   message`.
//! - `log_pipe!` inserts a bare `┃` spacer, mostly before a semantic message
//!   (`log_info!`, `log_warning!`, `log_error!`, `log_debug!`) that starts a block.
//! - `log_version!` prints the header once, `log_end!` the terminator once.
//! - `log_error_exit!` closes the output with an error corner.
//!
//! Logging can be switched off at runtime (tests, JSON output) and can be routed to
//! a file while a simulation runs.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Set once when `simulate --log` is active.
static LOG_CHANNEL: OnceLock<Sender<LogMessage>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Runtime controls for the logging macros.
pub struct Log;

impl Log {
    /// Enable or disable all logging output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Route all further output into `file_path` until the returned guard drops.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(tx.clone())
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;
            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => file.write_all(text.as_bytes())?,
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }
            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    /// Timestamp prefix shown while the clock is simulated, empty otherwise.
    pub fn timestamp_prefix() -> String {
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            format!("[{}] ", crate::time_source::now().format("%m-%d %H:%M:%S"))
        } else {
            String::new()
        }
    }
}

/// Flushes and joins the file logger thread on drop.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Write one formatted log line. Public only for the macros.
#[doc(hidden)]
pub fn emit(open: &str, message: &str) {
    if !Log::is_enabled() {
        return;
    }
    let prefix = Log::timestamp_prefix();
    let mut text = String::new();
    for line in open.split('\n') {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&prefix);
        text.push_str(line);
    }
    text.push_str(message);
    text.push('\n');
    write_output(&text);
}

fn write_output(text: &str) {
    if let Some(tx) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($open:expr, $fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($open, &format!($fmt $($arg)*))
    };
    ($open:expr, $expr:expr) => {
        $crate::logger::emit($open, &format!("{}", $expr))
    };
}

/// Continue the current block: `┣ message`.
#[macro_export]
macro_rules! log_decorated {
    ($($t:tt)+) => { $crate::__log_line!("┣ ", $($t)+) };
}

/// Nested detail line: `┃   message`.
#[macro_export]
macro_rules! log_indented {
    ($($t:tt)+) => { $crate::__log_line!("┃   ", $($t)+) };
}

/// Start a new block: blank pipe, then `┣ message`.
#[macro_export]
macro_rules! log_block_start {
    ($($t:tt)+) => { $crate::__log_line!("┃\n┣ ", $($t)+) };
}

/// Bare `┃` spacer.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::logger::emit("┃", "")
    };
}

/// Application header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::logger::emit(
            "",
            &format!("┏ horizon v{} ━━╸", env!("CARGO_PKG_VERSION")),
        )
    };
}

/// Output terminator.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::logger::emit("╹", "")
    };
}

#[macro_export]
macro_rules! log_info {
    ($($t:tt)+) => { $crate::__log_line!("┣[\x1b[32mINFO\x1b[0m] ", $($t)+) };
}

#[macro_export]
macro_rules! log_debug {
    ($($t:tt)+) => { $crate::__log_line!("┣[\x1b[36mDEBUG\x1b[0m] ", $($t)+) };
}

#[macro_export]
macro_rules! log_warning {
    ($($t:tt)+) => { $crate::__log_line!("┣[\x1b[33mWARNING\x1b[0m] ", $($t)+) };
}

#[macro_export]
macro_rules! log_error {
    ($($t:tt)+) => { $crate::__log_line!("┣[\x1b[31mERROR\x1b[0m] ", $($t)+) };
}

/// Error that ends the output: blank pipe, then `┗[ERROR] message`.
#[macro_export]
macro_rules! log_error_exit {
    ($($t:tt)+) => { $crate::__log_line!("┃\n┗[\x1b[31mERROR\x1b[0m] ", $($t)+) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes() {
        assert_eq!(
            strip_ansi_codes("┣[\x1b[33mWARNING\x1b[0m] careful"),
            "┣[WARNING] careful"
        );
        assert_eq!(strip_ansi_codes("plain \x1b text"), "plain \x1b text");
    }
}
