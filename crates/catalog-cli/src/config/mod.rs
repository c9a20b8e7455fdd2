//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig         # Host, port, shutdown, environment
//! ├── middleware: MiddlewareConfig # CORS, recovery/timeouts
//! └── cache: CacheConfig           # Cache-service URL, backoff, bounds
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! ```bash
//! catalog --port 8080 --cache-service-url redis://cache:6379
//!
//! PORT=8080 CACHE_SERVICE_URL=redis://cache:6379 catalog
//! ```

mod middleware;
mod server;

use std::process;

use anyhow::Context;
use catalog_cache::CacheConfig;
use clap::Parser;
use serde::{Deserialize, Serialize};

pub use self::middleware::MiddlewareConfig;
pub use self::server::{AppEnv, ServerConfig};
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "catalog")]
#[command(about = "Catalog API server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Cache-service connection configuration.
    #[clap(flatten)]
    pub cache: CacheConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is read before clap parses arguments so its values act
    /// as environment defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        self.cache
            .validate()
            .context("invalid cache service configuration")?;
        Ok(())
    }

    /// Logs configuration (no credentials).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            url = %self.cache.redacted_url(),
            reconnect_base_ms = self.cache.cache_reconnect_base_ms,
            reconnect_max_ms = self.cache.cache_reconnect_max_ms,
            close_timeout_secs = self.cache.cache_close_timeout_secs,
            "Cache service configuration"
        );
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_from_empty_arguments() {
        let cli = Cli::try_parse_from(["catalog"]).unwrap();

        assert_eq!(cli.server.port, 3000);
        assert_eq!(cli.server.shutdown_timeout(), Duration::from_secs(10));
        assert_eq!(cli.middleware.recovery.request_timeout, 30);
        assert_eq!(
            cli.middleware.cors.allowed_origins,
            vec!["http://localhost:5173".to_owned()]
        );
        assert_eq!(cli.cache.cache_reconnect_base_ms, 200);
        assert_eq!(cli.cache.cache_reconnect_max_ms, 3000);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "catalog",
            "--port",
            "8080",
            "--app-env",
            "production",
            "--cors-origin",
            "https://a.example,https://b.example",
            "--cache-service-url",
            "redis://cache:6379",
        ])
        .unwrap();

        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.server.app_env, AppEnv::Production);
        assert_eq!(cli.middleware.cors.allowed_origins.len(), 2);
        assert_eq!(cli.cache.cache_service_url, "redis://cache:6379");
    }

    #[test]
    fn unknown_app_env_falls_back_to_production() {
        let cli = Cli::try_parse_from(["catalog", "--app-env", "test", "--port", "80"]).unwrap();

        assert_eq!(cli.server.app_env, AppEnv::Production);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_cache_url() {
        let cli =
            Cli::try_parse_from(["catalog", "--cache-service-url", "http://cache:6379"]).unwrap();
        assert!(cli.validate().is_err());
    }
}
