//! Signal handling for the long-running commands.
//!
//! `monitor` and `simulate` run until the user interrupts them. A background
//! thread turns SIGINT, SIGTERM and SIGHUP into a [`SignalMessage::Shutdown`] and
//! SIGUSR2 into a [`SignalMessage::Reload`], delivered over a channel so the
//! command loop can wait on it alongside its other work.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    /// Reload the configuration (SIGUSR2)
    Reload,
    /// Stop the command (SIGINT, SIGTERM, SIGHUP)
    Shutdown,
}

/// Signal handling state shared between threads
pub struct SignalState {
    /// Cleared once a shutdown signal arrives
    pub running: Arc<AtomicBool>,
    pub signal_receiver: Receiver<SignalMessage>,
}

impl SignalState {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn shutdown_message(sig: i32, debug_enabled: bool) -> &'static str {
    match sig {
        SIGINT if debug_enabled => "Received SIGINT (Ctrl+C), shutting down...",
        SIGINT => "Received interrupt signal, shutting down...",
        SIGTERM => "Received termination request, shutting down...",
        SIGHUP => "Received hangup signal, shutting down...",
        _ => "Received shutdown signal, shutting down...",
    }
}

/// Install the handlers and spawn the thread that forwards signals.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let (signal_sender, signal_receiver) = channel::<SignalMessage>();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running_clone = Arc::clone(&running);
    thread::spawn(move || {
        for sig in signals.forever() {
            if sig == SIGUSR2 {
                log_pipe!();
                log_info!("Received configuration reload signal");
                if forward(&signal_sender, SignalMessage::Reload).is_err() {
                    break;
                }
                continue;
            }

            log_pipe!();
            log_info!("{}", shutdown_message(sig, debug_enabled));
            running_clone.store(false, Ordering::SeqCst);
            // Keep the thread alive so repeated signals do not kill the process.
            let _ = forward(&signal_sender, SignalMessage::Shutdown);
        }
    });

    Ok(SignalState {
        running,
        signal_receiver,
    })
}

fn forward(sender: &Sender<SignalMessage>, message: SignalMessage) -> Result<()> {
    sender
        .send(message)
        .map_err(|_| anyhow::anyhow!("signal channel disconnected"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_messages() {
        assert!(shutdown_message(SIGINT, true).contains("SIGINT"));
        assert!(!shutdown_message(SIGINT, false).contains("SIGINT"));
        assert!(shutdown_message(SIGTERM, false).contains("termination"));
        assert!(shutdown_message(SIGHUP, false).contains("hangup"));
    }

    #[test]
    fn test_forward_reports_disconnected_channel() {
        let (tx, rx) = channel();
        forward(&tx, SignalMessage::Reload).unwrap();
        assert_eq!(rx.recv().unwrap(), SignalMessage::Reload);

        drop(rx);
        assert!(forward(&tx, SignalMessage::Shutdown).is_err());
    }
}
