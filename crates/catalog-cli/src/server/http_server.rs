//! HTTP listener startup.

use tokio::net::TcpListener;

use super::{ServerError, ServerResult, TRACING_TARGET_STARTUP};
use crate::config::ServerConfig;

/// Binds the HTTP listener to the configured address.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address cannot be bound.
pub async fn bind_listener(server_config: &ServerConfig) -> ServerResult<TcpListener> {
    let server_addr = server_config.server_addr();

    let listener = match TcpListener::bind(server_addr).await {
        Ok(listener) => listener,
        Err(listener_err) => {
            tracing::error!(
                target: TRACING_TARGET_STARTUP,
                addr = %server_addr,
                error = %listener_err,
                "Failed to bind to address"
            );

            return Err(ServerError::Bind {
                address: server_addr,
                source: listener_err,
            });
        }
    };

    let local_addr = listener.local_addr().map_err(ServerError::Runtime)?;
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %local_addr,
        "Server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    Ok(listener)
}
