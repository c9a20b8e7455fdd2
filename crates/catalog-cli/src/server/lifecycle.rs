//! Server lifecycle: serving, draining and the shutdown deadline.
//!
//! ```text
//! starting ──▶ serving ──signal──▶ draining ──▶ stopped
//!                                     │
//!                                     └──deadline──▶ forced-stopped
//! ```
//!
//! Draining is strictly ordered: the HTTP server finishes every in-flight
//! request first, then the cache-service connection is closed. The deadline
//! starts with the first signal and is never restarted.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::io;
use std::time::Duration;

use axum::Router;
use catalog_cache::{CacheClient, ConnectionState};
use strum::{AsRefStr, Display, IntoStaticStr};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinError;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use super::{ServerError, ServerResult, ShutdownSignal, TRACING_TARGET_SHUTDOWN};

/// Phase of the process lifecycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum LifecyclePhase {
    /// Listener being bound, cache client starting
    #[default]
    Starting,
    /// Accepting requests
    Serving,
    /// Finishing in-flight requests, then closing the cache connection
    Draining,
    /// Everything released in time
    Stopped,
    /// Deadline elapsed or the cache connection was not released
    ForcedStopped,
}

/// How the process stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum ShutdownOutcome {
    /// All resources released before the deadline.
    Graceful,
    /// Deadline elapsed, or the cache connection could not be closed.
    Forced,
}

impl ShutdownOutcome {
    /// Returns the process exit status for this outcome.
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Graceful => 0,
            Self::Forced => 1,
        }
    }
}

impl fmt::Display for ShutdownOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graceful => f.write_str("graceful"),
            Self::Forced => f.write_str("forced"),
        }
    }
}

/// Drives the server from `serving` to a terminal phase.
#[derive(Debug)]
pub struct Lifecycle {
    phase: watch::Sender<LifecyclePhase>,
    shutdown_timeout: Duration,
    cache_close_timeout: Duration,
}

impl Lifecycle {
    /// Creates a lifecycle in the `starting` phase.
    ///
    /// `shutdown_timeout` bounds the whole drain; `cache_close_timeout` bounds
    /// only the cache-service close inside it.
    pub fn new(shutdown_timeout: Duration, cache_close_timeout: Duration) -> Self {
        let (phase, _) = watch::channel(LifecyclePhase::Starting);
        Self {
            phase,
            shutdown_timeout,
            cache_close_timeout,
        }
    }

    /// Returns a receiver notified on every phase change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LifecyclePhase> {
        self.phase.subscribe()
    }

    fn transition(&self, next: LifecyclePhase) {
        let previous = self.phase.send_replace(next);
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            from = %previous,
            to = %next,
            "Lifecycle phase changed"
        );
    }

    /// Serves `router` on `listener` until a signal arrives, then drains.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Runtime`] if the HTTP server stops on its own
    /// before any signal; the cache connection is closed first.
    pub async fn run(
        self,
        listener: TcpListener,
        router: Router,
        cache: CacheClient,
        signals: mpsc::UnboundedReceiver<ShutdownSignal>,
    ) -> ServerResult<ShutdownOutcome> {
        let drain = CancellationToken::new();
        let server = axum::serve(listener, router)
            .with_graceful_shutdown(drain.clone().cancelled_owned())
            .into_future();

        self.supervise(server, drain, cache, signals).await
    }

    /// Runs `server` and drives the phases around it.
    ///
    /// `server` must stop once `drain` is cancelled.
    async fn supervise<F>(
        self,
        server: F,
        drain: CancellationToken,
        cache: CacheClient,
        mut signals: mpsc::UnboundedReceiver<ShutdownSignal>,
    ) -> ServerResult<ShutdownOutcome>
    where
        F: Future<Output = io::Result<()>> + Send + 'static,
    {
        let mut server = tokio::spawn(server);

        self.transition(LifecyclePhase::Serving);

        let mut signals_open = true;
        let first = loop {
            tokio::select! {
                signal = signals.recv(), if signals_open => match signal {
                    Some(signal) => break signal,
                    None => {
                        signals_open = false;
                        tracing::warn!(
                            target: TRACING_TARGET_SHUTDOWN,
                            "No signal handler is installed; shutdown can only be forced externally"
                        );
                    }
                },
                joined = &mut server => {
                    return self.server_exited(joined, &cache).await;
                }
            }
        };

        self.transition(LifecyclePhase::Draining);
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            signal = %first,
            timeout_secs = self.shutdown_timeout.as_secs(),
            "Graceful shutdown initiated"
        );

        let started = Instant::now();
        let deadline = sleep(self.shutdown_timeout);
        tokio::pin!(deadline);

        drain.cancel();
        let close_bound = self.cache_close_timeout;
        let drained = async {
            if let Err(err) = flatten(server.await) {
                tracing::error!(
                    target: TRACING_TARGET_SHUTDOWN,
                    error = %err,
                    "HTTP server stopped with an error while draining"
                );
            }

            tracing::info!(
                target: TRACING_TARGET_SHUTDOWN,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "HTTP listener closed; closing cache service connection"
            );

            cache.close(close_bound).await
        };
        tokio::pin!(drained);

        loop {
            tokio::select! {
                biased;
                cache_state = &mut drained => {
                    return Ok(self.finish(cache_state, started));
                }
                () = &mut deadline => {
                    self.transition(LifecyclePhase::ForcedStopped);
                    tracing::error!(
                        target: TRACING_TARGET_SHUTDOWN,
                        timeout_secs = self.shutdown_timeout.as_secs(),
                        "Shutdown deadline exceeded, forcing termination"
                    );
                    return Ok(ShutdownOutcome::Forced);
                }
                signal = signals.recv(), if signals_open => match signal {
                    Some(signal) => {
                        tracing::warn!(
                            target: TRACING_TARGET_SHUTDOWN,
                            signal = %signal,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Shutdown already in progress, ignoring signal"
                        );
                    }
                    None => signals_open = false,
                },
            }
        }
    }

    /// Maps the cache close result to the terminal phase.
    fn finish(&self, cache_state: ConnectionState, started: Instant) -> ShutdownOutcome {
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if cache_state == ConnectionState::Errored {
            self.transition(LifecyclePhase::ForcedStopped);
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                elapsed_ms,
                "Cache service connection was not released, forcing termination"
            );
            return ShutdownOutcome::Forced;
        }

        self.transition(LifecyclePhase::Stopped);
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            elapsed_ms,
            "Shutdown completed"
        );
        ShutdownOutcome::Graceful
    }

    /// Handles the HTTP server ending without a shutdown request.
    async fn server_exited(
        &self,
        joined: Result<io::Result<()>, JoinError>,
        cache: &CacheClient,
    ) -> ServerResult<ShutdownOutcome> {
        let result = flatten(joined);
        if let Err(ref err) = result {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %err,
                "HTTP server stopped unexpectedly"
            );
        }

        let cache_state = cache.close(self.cache_close_timeout).await;
        let terminal = match (&result, cache_state) {
            (Ok(()), ConnectionState::Closed) => LifecyclePhase::Stopped,
            _ => LifecyclePhase::ForcedStopped,
        };
        self.transition(terminal);

        result.map_err(ServerError::Runtime)?;
        Ok(match terminal {
            LifecyclePhase::Stopped => ShutdownOutcome::Graceful,
            _ => ShutdownOutcome::Forced,
        })
    }
}

/// Collapses a join result of the server task into a single I/O result.
fn flatten(joined: Result<io::Result<()>, JoinError>) -> io::Result<()> {
    joined.unwrap_or_else(|err| Err(io::Error::other(err)))
}
