//! Error types for cache-service operations.

use std::time::Duration;

/// Result type for all cache-service operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for cache-service operations.
///
/// These errors stay inside the client: the driver logs them and retries,
/// callers only ever see the resulting [`ConnectionState`].
///
/// [`ConnectionState`]: crate::ConnectionState
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Redis client/connection errors
    #[error("Cache service connection error: {0}")]
    Connection(#[from] redis::RedisError),

    /// Operation timeout
    #[error("Operation timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// The link to the cache service dropped
    #[error("Cache service link closed: {reason}")]
    LinkClosed { reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    /// Create a link closed error
    pub fn link_closed(reason: impl Into<String>) -> Self {
        Self::LinkClosed {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_reason() {
        let err = Error::link_closed("reset by peer");
        assert_eq!(err.to_string(), "Cache service link closed: reset by peer");
    }
}
