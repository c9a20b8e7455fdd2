//! Tracing initialization and configuration.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppEnv;

/// Initializes the tracing subscriber for structured logging.
///
/// `development` logs at `debug` with human-readable ANSI output;
/// `production` logs at `info` as JSON lines. `RUST_LOG` overrides the level
/// in both cases.
///
/// ```bash
/// RUST_LOG=catalog_cache=trace,tower_http=debug catalog
/// ```
pub(super) fn init_tracing(app_env: AppEnv) -> anyhow::Result<()> {
    let env_filter = create_env_filter(app_env)?;

    let (pretty_layer, json_layer) = match app_env {
        AppEnv::Development => (
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_level(true)
                    .with_ansi(true),
            ),
            None,
        ),
        AppEnv::Production => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_ansi(false),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}

/// Returns the default filter directive for an environment.
fn default_directive(app_env: AppEnv) -> &'static str {
    match app_env {
        AppEnv::Development => "debug",
        AppEnv::Production => "info",
    }
}

/// Creates an environment filter for tracing.
fn create_env_filter(app_env: AppEnv) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(app_env)))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))
}
