//! HTTP listener, OS signals and the shutdown lifecycle.

/// Tracing target for server startup events.
pub const TRACING_TARGET_STARTUP: &str = "catalog_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "catalog_cli::server::shutdown";

mod error;
mod http_server;
mod lifecycle;
mod shutdown;

pub use error::{ServerError, ServerResult};
pub use http_server::bind_listener;
pub use lifecycle::{Lifecycle, ShutdownOutcome};
pub use shutdown::{ShutdownSignal, listen_for_signals};
