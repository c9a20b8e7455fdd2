use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Failure response envelope: `{"success": false, "message": ...}`.
///
/// The status code travels with the body but is not serialized.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Always `false` for this envelope
    pub success: bool,
    /// Message safe for client display
    pub message: Cow<'a, str>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    /// Creates a new error response.
    #[inline]
    pub const fn new(message: &'a str, status: StatusCode) -> Self {
        Self {
            success: false,
            message: Cow::Borrowed(message),
            status,
        }
    }

    /// Replaces the client-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_replaces_message() {
        let response =
            ErrorResponse::new("Route not found", StatusCode::NOT_FOUND).with_message("User not found");
        assert_eq!(response.message, "User not found");
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_response_serialization() {
        let response = ErrorResponse::new("Product not found", StatusCode::NOT_FOUND);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "success": false, "message": "Product not found" })
        );
    }
}
