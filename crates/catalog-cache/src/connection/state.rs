//! Observable connection state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};
use tokio::sync::watch;

use crate::TRACING_TARGET_CONNECTION;

/// Connection state of the cache-service client.
///
/// Written only by the client's driver task; everything else reads it.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    /// First connection attempt in progress
    #[default]
    Connecting,
    /// Link established and healthy
    Connected,
    /// Waiting out the backoff after a failed attempt or a dropped link
    Reconnecting,
    /// Closed on request
    Closed,
    /// Close was requested but did not finish within its bound
    Errored,
}

impl ConnectionState {
    /// Returns the label reported by the health endpoint.
    #[inline]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Returns whether the link is currently usable.
    #[inline]
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns whether the state can no longer change.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

/// Single-writer cell publishing state transitions.
///
/// Publishing goes through a `watch` channel, so it never waits on readers.
#[derive(Debug, Clone)]
pub(crate) struct StateCell {
    sender: Arc<watch::Sender<ConnectionState>>,
}

impl StateCell {
    /// Creates a cell in the [`ConnectionState::Connecting`] state.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ConnectionState::Connecting);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Returns the current state without waiting.
    #[inline]
    pub fn get(&self) -> ConnectionState {
        *self.sender.borrow()
    }

    /// Returns a receiver that observes every published transition.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.sender.subscribe()
    }

    /// Moves to `next` and reports the transition once.
    ///
    /// Terminal states are sticky. Returns whether the state changed.
    pub fn transition(&self, next: ConnectionState) -> bool {
        let mut previous = None;
        let changed = self.sender.send_if_modified(|current| {
            if *current == next || current.is_terminal() {
                return false;
            }

            previous = Some(*current);
            *current = next;
            true
        });

        if let Some(previous) = previous {
            tracing::info!(
                target: TRACING_TARGET_CONNECTION,
                from = previous.as_str(),
                to = next.as_str(),
                "Cache service connection state changed"
            );
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_lowercase() {
        assert_eq!(ConnectionState::Connecting.as_str(), "connecting");
        assert_eq!(ConnectionState::Connected.as_str(), "connected");
        assert_eq!(ConnectionState::Reconnecting.as_str(), "reconnecting");
        assert_eq!(ConnectionState::Closed.as_str(), "closed");
        assert_eq!(ConnectionState::Errored.to_string(), "errored");
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_value(ConnectionState::Reconnecting).unwrap();
        assert_eq!(json, "reconnecting");
    }

    #[test]
    fn transition_reports_changes_only() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), ConnectionState::Connecting);

        assert!(cell.transition(ConnectionState::Connected));
        assert!(!cell.transition(ConnectionState::Connected));
        assert_eq!(cell.get(), ConnectionState::Connected);
    }

    #[test]
    fn terminal_states_are_sticky() {
        let cell = StateCell::new();
        assert!(cell.transition(ConnectionState::Closed));
        assert!(!cell.transition(ConnectionState::Connected));
        assert!(!cell.transition(ConnectionState::Errored));
        assert_eq!(cell.get(), ConnectionState::Closed);
    }

    #[test]
    fn subscribers_observe_transitions() {
        let cell = StateCell::new();
        let mut receiver = cell.subscribe();
        assert!(!receiver.has_changed().unwrap());

        cell.transition(ConnectionState::Reconnecting);
        assert!(receiver.has_changed().unwrap());
        assert_eq!(*receiver.borrow_and_update(), ConnectionState::Reconnecting);
    }
}
