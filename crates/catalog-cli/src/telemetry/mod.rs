//! Telemetry and tracing configuration.

mod tracing;

use anyhow::Context;

use crate::config::AppEnv;

/// Initializes the tracing subscriber for the given environment.
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(crate) fn init_tracing(app_env: AppEnv) -> anyhow::Result<()> {
    tracing::init_tracing(app_env).context("Failed to initialize tracing")
}
