#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for cache client operations.
///
/// Use this target for logging client initialization, configuration, and close requests.
pub const TRACING_TARGET_CLIENT: &str = "catalog_cache::client";

/// Tracing target for cache connection operations.
///
/// Use this target for logging connection establishment, state transitions, and reconnects.
pub const TRACING_TARGET_CONNECTION: &str = "catalog_cache::connection";

mod client;
mod connection;
mod error;
mod transport;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use client::{CacheClient, CacheConfig};
pub use connection::{ConnectionState, ReconnectPolicy};
pub use error::{Error, Result};
pub use transport::{CacheLink, CacheTransport, RedisLink, RedisTransport};
