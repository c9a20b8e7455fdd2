//! Transport seam between the client driver and the cache service.

mod redis_transport;

use async_trait::async_trait;
pub use redis_transport::{RedisLink, RedisTransport};

use crate::Result;

/// Establishes links to the cache service.
///
/// The driver calls [`connect`] once per attempt and owns the resulting link
/// until it fails or a close is requested.
///
/// [`connect`]: CacheTransport::connect
#[async_trait]
pub trait CacheTransport: Send + Sync + 'static {
    /// The link type produced by a successful connect.
    type Link: CacheLink;

    /// Performs one connection attempt.
    async fn connect(&self) -> Result<Self::Link>;
}

/// An established link to the cache service.
#[async_trait]
pub trait CacheLink: Send + 'static {
    /// Resolves with the transport error once the link is no longer usable.
    ///
    /// Must stay pending while the link is healthy.
    async fn failed(&mut self) -> crate::Error;

    /// Closes the link politely.
    async fn quit(&mut self) -> Result<()>;
}
