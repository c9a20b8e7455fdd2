//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Security (CORS, protective headers, body limits)
//! - Recovery (panics, timeouts, service errors)
//! - Observability (request ids, tracing)
//!
//! ```rust,no_run
//! use axum::Router;
//! use catalog_server::middleware::{
//!     RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_default_recovery()
//!     .with_observability()
//!     .with_default_security();
//! ```

mod constants;
mod observability;
mod recovery;
mod security;

pub use constants::DEFAULT_MAX_BODY_SIZE;
pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, RouterSecurityExt, SecurityHeadersConfig};
