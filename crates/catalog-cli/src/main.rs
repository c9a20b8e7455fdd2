#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;
mod telemetry;

use std::process;

use anyhow::Context;
use axum::Router;
use catalog_cache::CacheClient;
use catalog_core::Catalog;
use catalog_server::handler::routes;
use catalog_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt, SecurityHeadersConfig,
};
use catalog_server::service::{ServiceState, Uptime};

use crate::config::{Cli, MiddlewareConfig};
use crate::server::{Lifecycle, ServerError, ShutdownOutcome};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "catalog_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "catalog_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "catalog_cli::config";

#[tokio::main]
async fn main() {
    let error = match run().await {
        Ok(outcome) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                outcome = %outcome,
                exit_code = outcome.exit_code(),
                "application terminated"
            );
            process::exit(outcome.exit_code());
        }
        Err(error) => error,
    };

    report_error(&error);
    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<ShutdownOutcome> {
    let uptime = Uptime::start();
    let cli = Cli::init();

    telemetry::init_tracing(cli.server.app_env)?;
    cli.log();
    cli.validate()
        .map_err(|err| ServerError::invalid_config(&err))?;

    let lifecycle = Lifecycle::new(cli.server.shutdown_timeout(), cli.cache.close_timeout());
    let listener = server::bind_listener(&cli.server).await?;

    let cache = CacheClient::connect(&cli.cache)
        .map_err(ServerError::Cache)
        .context("failed to start cache service client")?;

    let state = ServiceState::new(Catalog::seeded(), cache.clone(), uptime);
    let router = create_router(state, &cli.middleware);
    let signals = server::listen_for_signals();

    let phases = lifecycle.subscribe();
    let result = lifecycle.run(listener, router, cache, signals).await;
    let phase = *phases.borrow();
    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        phase = %phase,
        uptime_secs = uptime.seconds(),
        "Lifecycle ended"
    );

    Ok(result?)
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS, security headers, body limits
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes(state)
        .with_security(&middleware.cors, &SecurityHeadersConfig::default())
        .with_observability()
        .with_recovery(&middleware.recovery)
}

/// Logs a fatal error, with structured context when it is a [`ServerError`].
fn report_error(error: &anyhow::Error) {
    if !tracing::enabled!(tracing::Level::ERROR) {
        eprintln!("Error: {error:#}");
        return;
    }

    match error.downcast_ref::<ServerError>() {
        Some(server_error) => {
            let context = server_error.context();
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %format!("{error:#}"),
                context = ?context,
                "application terminated with error"
            );

            if let Some(suggestion) = server_error.suggestion() {
                tracing::info!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    suggestion = suggestion,
                    "Recovery suggestion"
                );
            }
        }
        None => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %format!("{error:#}"),
                "application terminated with error"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use catalog_cache::mock::MockTransport;
    use catalog_cache::ReconnectPolicy;

    use super::*;

    fn middleware() -> MiddlewareConfig {
        MiddlewareConfig::default()
    }

    #[tokio::test]
    async fn router_applies_middleware_stack() -> anyhow::Result<()> {
        let cache = CacheClient::spawn(MockTransport::new(), ReconnectPolicy::default());
        let state = ServiceState::new(Catalog::seeded(), cache, Uptime::start());
        let server = TestServer::new(create_router(state, &middleware()))?;

        let response = server.get("/api/users/1").await;
        response.assert_status_ok();

        let headers = response.headers();
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(
            headers
                .get("x-content-type-options")
                .and_then(|value| value.to_str().ok()),
            Some("nosniff")
        );
        Ok(())
    }

    #[tokio::test]
    async fn router_keeps_not_found_envelope() -> anyhow::Result<()> {
        let cache = CacheClient::spawn(MockTransport::new(), ReconnectPolicy::default());
        let state = ServiceState::new(Catalog::seeded(), cache, Uptime::start());
        let server = TestServer::new(create_router(state, &middleware()))?;

        let response = server.get("/nope").await;
        response.assert_status_not_found();
        assert!(response.headers().contains_key("x-request-id"));
        Ok(())
    }
}
