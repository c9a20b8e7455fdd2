//! Cache-service client and its configuration.

mod cache_client;
mod cache_config;

pub use cache_client::CacheClient;
pub use cache_config::CacheConfig;
