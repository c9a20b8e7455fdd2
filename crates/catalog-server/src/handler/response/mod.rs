//! Response envelopes returned by the handlers.

mod api_response;
mod error_response;
mod monitor;

pub use api_response::ApiResponse;
pub use error_response::ErrorResponse;
pub use monitor::HealthStatus;
