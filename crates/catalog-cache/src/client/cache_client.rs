//! Cache-service client with a background connection driver.
//!
//! The client owns a single driver task that runs the connection state
//! machine:
//!
//! - **connecting**: first attempt after [`CacheClient::spawn`]
//! - **connected**: link established; the attempt counter is reset
//! - **reconnecting**: an attempt failed or the link dropped; the driver waits
//!   [`ReconnectPolicy::delay`] before trying again
//! - **closed** / **errored**: terminal, reached through [`CacheClient::close`]
//!
//! Errors never leave the driver. Callers read the current state with
//! [`CacheClient::state`], which never waits.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

use crate::connection::StateCell;
use crate::{
    CacheConfig, CacheLink, CacheTransport, ConnectionState, RedisTransport, ReconnectPolicy,
    Result, TRACING_TARGET_CLIENT, TRACING_TARGET_CONNECTION,
};

/// Handle to the cache-service connection.
///
/// This handle is cheaply cloneable and thread-safe. All clones observe the
/// same connection state and share one driver task.
#[derive(Debug, Clone)]
pub struct CacheClient {
    inner: Arc<CacheClientInner>,
}

/// Inner data for the cache client
#[derive(Debug)]
struct CacheClientInner {
    state: StateCell,
    cancel: CancellationToken,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl CacheClient {
    /// Creates a Redis-backed client and starts connecting in the background.
    ///
    /// Returns as soon as the driver is spawned; it does not wait for the
    /// connection. Fails only on invalid configuration.
    pub fn connect(config: &CacheConfig) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            url = %config.redacted_url(),
            base_delay_ms = config.cache_reconnect_base_ms,
            max_delay_ms = config.cache_reconnect_max_ms,
            "Starting cache service client"
        );

        let transport = RedisTransport::new(config)?;
        Ok(Self::spawn(transport, config.reconnect_policy()))
    }

    /// Starts a driver over the given transport.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<T: CacheTransport>(transport: T, policy: ReconnectPolicy) -> Self {
        let state = StateCell::new();
        let cancel = CancellationToken::new();
        let driver = tokio::spawn(drive(transport, policy, state.clone(), cancel.clone()));

        Self {
            inner: Arc::new(CacheClientInner {
                state,
                cancel,
                driver: Mutex::new(Some(driver)),
            }),
        }
    }

    /// Returns the current connection state without waiting.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.inner.state.get()
    }

    /// Returns a receiver notified on every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// Requests close and waits at most `bound` for the driver to finish.
    ///
    /// Returns [`ConnectionState::Closed`] when the link was released in time
    /// and [`ConnectionState::Errored`] otherwise; in the latter case the
    /// driver is aborted. Calling this again returns the current state.
    pub async fn close(&self, bound: Duration) -> ConnectionState {
        self.inner.cancel.cancel();

        let driver = self
            .inner
            .driver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(mut driver) = driver else {
            return self.state();
        };

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            bound_ms = bound.as_millis() as u64,
            "Closing cache service connection"
        );

        match timeout(bound, &mut driver).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(
                    target: TRACING_TARGET_CLIENT,
                    error = %err,
                    "Cache service driver terminated abnormally"
                );
                self.inner.state.transition(ConnectionState::Errored);
            }
            Err(_) => {
                driver.abort();
                tracing::error!(
                    target: TRACING_TARGET_CLIENT,
                    bound_ms = bound.as_millis() as u64,
                    "Cache service close did not complete in time"
                );
                self.inner.state.transition(ConnectionState::Errored);
            }
        }

        self.state()
    }
}

impl Drop for CacheClientInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Runs the connection state machine until cancelled.
async fn drive<T: CacheTransport>(
    transport: T,
    policy: ReconnectPolicy,
    state: StateCell,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        let connected = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            connected = transport.connect() => connected,
        };

        match connected {
            Ok(mut link) => {
                attempt = 0;
                state.transition(ConnectionState::Connected);

                let failure = tokio::select! {
                    biased;
                    () = cancel.cancelled() => None,
                    err = link.failed() => Some(err),
                };

                let Some(err) = failure else {
                    if let Err(err) = link.quit().await {
                        tracing::warn!(
                            target: TRACING_TARGET_CONNECTION,
                            error = %err,
                            "Cache service did not acknowledge quit"
                        );
                    }
                    break;
                };

                tracing::error!(
                    target: TRACING_TARGET_CONNECTION,
                    error = %err,
                    "Cache service link lost"
                );
            }
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET_CONNECTION,
                    error = %err,
                    attempt = attempt + 1,
                    "Cache service connection attempt failed"
                );
            }
        }

        attempt = attempt.saturating_add(1);
        state.transition(ConnectionState::Reconnecting);

        let delay = policy.delay(attempt);
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Cache service reconnecting"
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = sleep(delay) => {}
        }
    }

    state.transition(ConnectionState::Closed);
}
