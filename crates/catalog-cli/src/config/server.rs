//! HTTP server configuration.

use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::TRACING_TARGET_CONFIG;

/// Deployment environment.
///
/// Only affects log level and format. Any label other than `development`
/// selects [`AppEnv::Production`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AppEnv {
    /// Debug level, human-readable output
    #[default]
    Development,
    /// Info level, JSON lines
    Production,
}

impl AppEnv {
    /// Parses an environment label; never fails.
    pub fn parse_label(label: &str) -> Result<Self, Infallible> {
        match label.trim() {
            "development" => Ok(Self::Development),
            _ => Ok(Self::Production),
        }
    }
}

/// HTTP server configuration.
///
/// # Environment Variables
///
/// - `HOST` - Server host address (default: 127.0.0.1)
/// - `PORT` - Server port (default: 3000)
/// - `SHUTDOWN_TIMEOUT` - Drain deadline in seconds (default: 10, max: 300)
/// - `APP_ENV` - `development`, anything else is production (default: development)
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Host address to bind the server to.
    ///
    /// Use "127.0.0.1" for localhost only, "0.0.0.0" for all interfaces.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// TCP port number for the server to listen on.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Maximum time in seconds to wait for graceful shutdown.
    ///
    /// Covers draining in-flight requests and closing the cache-service
    /// connection. When it elapses the process exits with status 1.
    /// Valid range: 1-300 seconds.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 10)]
    pub shutdown_timeout: u64,

    /// Deployment environment; selects log level and format.
    #[arg(
        long,
        env = "APP_ENV",
        default_value = "development",
        value_parser = AppEnv::parse_label
    )]
    #[serde(default)]
    pub app_env: AppEnv,
}

/// Default host address for development.
fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

impl ServerConfig {
    /// Validates all configuration values and returns errors for invalid settings.
    ///
    /// # Errors
    ///
    /// - Shutdown timeout must be 1-300 seconds
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.shutdown_timeout == 0 || self.shutdown_timeout > 300 {
            return Err(anyhow!(
                "Shutdown timeout {} seconds is invalid. Must be between 1 and 300 seconds.",
                self.shutdown_timeout
            ));
        }

        Ok(())
    }

    /// Returns the complete socket address for server binding.
    #[must_use]
    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the graceful shutdown timeout as a `Duration`.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns whether the server is configured to bind to all interfaces.
    #[must_use]
    pub const fn binds_to_all_interfaces(&self) -> bool {
        match self.host {
            IpAddr::V4(addr) => addr.is_unspecified(),
            IpAddr::V6(addr) => addr.is_unspecified(),
        }
    }

    /// Logs server configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            host = %self.host,
            port = self.port,
            shutdown_timeout_secs = self.shutdown_timeout,
            app_env = %self.app_env,
            "Server configuration"
        );
    }
}

impl Default for ServerConfig {
    /// Creates a development-friendly configuration with safe defaults.
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 3000,
            shutdown_timeout: 10,
            app_env: AppEnv::Development,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(!config.binds_to_all_interfaces());
    }

    #[test]
    fn accepts_any_port() {
        for port in [80, 443, 3000, 65535] {
            let config = ServerConfig {
                port,
                ..ServerConfig::default()
            };
            assert!(config.validate().is_ok(), "port {port}");
        }
    }

    #[test]
    fn reject_invalid_shutdown_timeouts() {
        let mut config = ServerConfig::default();

        config.shutdown_timeout = 0;
        assert!(config.validate().is_err());

        config.shutdown_timeout = 301;
        assert!(config.validate().is_err());

        config.shutdown_timeout = 60;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn server_addr_returns_correct_socket() {
        let config = ServerConfig {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            ..ServerConfig::default()
        };

        let addr = config.server_addr();
        assert_eq!(addr.port(), 3000);
        assert!(config.binds_to_all_interfaces());
    }

    #[test]
    fn app_env_labels() {
        assert_eq!(AppEnv::Development.as_ref(), "development");
        assert_eq!(AppEnv::Production.to_string(), "production");
    }

    #[test]
    fn unknown_app_env_is_production() {
        assert_eq!(AppEnv::parse_label("development"), Ok(AppEnv::Development));
        assert_eq!(AppEnv::parse_label("production"), Ok(AppEnv::Production));
        assert_eq!(AppEnv::parse_label("test"), Ok(AppEnv::Production));
        assert_eq!(AppEnv::parse_label("staging"), Ok(AppEnv::Production));
    }
}
