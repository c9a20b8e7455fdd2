//! Shutdown signal handling.
//!
//! Signals are forwarded into a channel instead of resolving a single future,
//! so the lifecycle can observe every delivery, including repeats while it is
//! already draining.

use strum::{AsRefStr, Display};
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix;
use tokio::sync::mpsc;

use super::TRACING_TARGET_SHUTDOWN;

/// Termination request delivered by the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
pub enum ShutdownSignal {
    /// SIGINT / Ctrl+C
    #[strum(serialize = "SIGINT")]
    Interrupt,
    /// SIGTERM
    #[strum(serialize = "SIGTERM")]
    Terminate,
}

/// Starts forwarding SIGINT (Ctrl+C) and SIGTERM into the returned receiver.
///
/// Must be called from within a Tokio runtime. A handler that fails to
/// install is logged and skipped; the receiver closes once no handler is left.
pub fn listen_for_signals() -> mpsc::UnboundedReceiver<ShutdownSignal> {
    let (sender, receiver) = mpsc::unbounded_channel();

    #[cfg(unix)]
    tokio::spawn(forward_terminate(sender.clone()));
    tokio::spawn(forward_interrupt(sender));

    receiver
}

async fn forward_interrupt(sender: mpsc::UnboundedSender<ShutdownSignal>) {
    loop {
        if let Err(err) = ctrl_c().await {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %err,
                "Failed to install Ctrl+C handler"
            );
            return;
        }

        if sender.send(ShutdownSignal::Interrupt).is_err() {
            return;
        }
    }
}

#[cfg(unix)]
async fn forward_terminate(sender: mpsc::UnboundedSender<ShutdownSignal>) {
    let mut signal = match unix::signal(unix::SignalKind::terminate()) {
        Ok(signal) => signal,
        Err(err) => {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %err,
                "Failed to install SIGTERM handler"
            );
            return;
        }
    };

    while signal.recv().await.is_some() {
        if sender.send(ShutdownSignal::Terminate).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_names() {
        assert_eq!(ShutdownSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(ShutdownSignal::Terminate.as_ref(), "SIGTERM");
    }
}
