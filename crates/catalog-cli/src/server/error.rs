//! Fatal errors of the `catalog` binary.

use std::io;
use std::net::SocketAddr;

use strum::IntoStaticStr;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Failure that ends the process with exit status 1.
#[derive(Debug, Error, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ServerError {
    /// Flags or environment variables failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The HTTP server stopped before any shutdown signal.
    #[error("HTTP server failed: {0}")]
    Runtime(#[source] io::Error),

    /// The cache-service client could not be created.
    #[error("cache service client failed: {0}")]
    Cache(#[source] catalog_cache::Error),
}

impl ServerError {
    /// Wraps a validation failure, keeping its whole context chain.
    pub fn invalid_config(err: &anyhow::Error) -> Self {
        Self::InvalidConfig(format!("{err:#}"))
    }

    /// Returns a stable label for logs.
    #[inline]
    pub fn code(&self) -> &'static str {
        self.into()
    }

    /// Returns a hint for the operator, when one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig(_) => Some("Run with --help to list flags and their environment variables"),
            Self::Bind { source, .. } => match source.kind() {
                io::ErrorKind::AddrInUse => Some("Stop the process using the port or set PORT"),
                io::ErrorKind::PermissionDenied => {
                    Some("Binding this port needs extra privileges; set PORT or grant them")
                }
                io::ErrorKind::AddrNotAvailable => Some("HOST is not an address of this machine"),
                _ => None,
            },
            Self::Runtime(_) => None,
            Self::Cache(_) => Some("CACHE_SERVICE_URL must use the redis:// or rediss:// scheme"),
        }
    }

    /// Returns key-value pairs for the fatal-error log line.
    pub fn context(&self) -> Vec<(&'static str, String)> {
        let mut context = vec![("code", self.code().to_owned())];

        match self {
            Self::Bind { address, source } => {
                context.push(("address", address.to_string()));
                context.push(("io_error_kind", source.kind().to_string()));
            }
            Self::Runtime(err) => context.push(("io_error_kind", err.kind().to_string())),
            Self::InvalidConfig(_) | Self::Cache(_) => {}
        }

        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_name_the_variant() {
        let address: SocketAddr = ([127, 0, 0, 1], 3000).into();

        assert_eq!(ServerError::InvalidConfig(String::new()).code(), "invalid-config");
        assert_eq!(
            ServerError::Bind {
                address,
                source: io::Error::other("taken"),
            }
            .code(),
            "bind"
        );
        assert_eq!(ServerError::Runtime(io::Error::other("boom")).code(), "runtime");
        assert_eq!(
            ServerError::Cache(catalog_cache::Error::invalid_config("bad url")).code(),
            "cache"
        );
    }

    #[test]
    fn invalid_config_keeps_full_chain() {
        let err = anyhow::anyhow!("timeout out of range").context("invalid server configuration");
        let config_err = ServerError::invalid_config(&err);

        let message = config_err.to_string();
        assert!(message.contains("invalid server configuration"));
        assert!(message.contains("timeout out of range"));
        assert!(config_err.suggestion().is_some());
    }

    #[test]
    fn bind_context_names_address() {
        let err = ServerError::Bind {
            address: ([0, 0, 0, 0], 80).into(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };

        let context = err.context();
        assert!(context.contains(&("address", "0.0.0.0:80".to_owned())));
        assert!(context.iter().any(|(key, _)| *key == "io_error_kind"));
        assert!(err.suggestion().is_some());
    }
}
