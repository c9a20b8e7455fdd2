//! Request handlers and route assembly.

mod error;
mod monitors;
mod products;
pub mod response;
mod users;

use axum::Router;
use axum::http::Uri;

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Answers every request that matched no route.
async fn fallback(uri: Uri) -> Error<'static> {
    tracing::debug!(
        target: crate::TRACING_TARGET_HANDLER,
        path = %uri.path(),
        "Route not found"
    );

    ErrorKind::NotFound.into_error()
}

/// Returns a [`Router`] with every API route and the not-found fallback.
///
/// Known paths requested with an unsupported method are treated as unknown
/// routes too. Middleware is layered by the caller.
pub fn routes(state: ServiceState) -> Router {
    Router::new()
        .merge(monitors::routes())
        .merge(users::routes())
        .merge(products::routes())
        .fallback(fallback)
        .method_not_allowed_fallback(fallback)
        .with_state(state)
}
