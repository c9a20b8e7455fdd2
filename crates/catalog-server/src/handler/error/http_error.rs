//! HTTP error type returned by handlers and middleware.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use strum::{Display, IntoStaticStr};

use crate::TRACING_TARGET_HANDLER;
use crate::handler::response::ErrorResponse;

/// Handler failure rendered as the `{success: false, message}` envelope.
///
/// The [`ErrorKind`] fixes the status code and the default message. A custom
/// message replaces the default one in the body; context is only logged.
#[derive(Debug, Clone)]
#[must_use = "errors do nothing unless rendered"]
pub struct Error<'a> {
    kind: ErrorKind,
    message: Option<Cow<'a, str>>,
    context: Option<Cow<'a, str>>,
}

impl<'a> Error<'a> {
    /// Creates an error of the given kind with its default message.
    #[inline]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            context: None,
        }
    }

    /// Attaches log-only context.
    #[inline]
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Replaces the message sent to the client.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }

    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Detaches the error from any borrowed message or context.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            message: self.message.map(|m| Cow::Owned(m.into_owned())),
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
        }
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind.status_code().as_u16(), self.kind, self.message())?;
        match self.context.as_deref() {
            Some(context) => write!(f, " ({context})"),
            None => Ok(()),
        }
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        if let Some(context) = self.context.as_deref() {
            tracing::debug!(
                target: TRACING_TARGET_HANDLER,
                kind = %self.kind,
                context,
                "Request failed"
            );
        }

        let response = self.kind.response();
        match self.message {
            Some(message) => response.with_message(message).into_response(),
            None => response.into_response(),
        }
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type of the request handlers.
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Failures the API reports to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[must_use = "error kinds do nothing unless turned into errors"]
pub enum ErrorKind {
    /// Path parameter could not be extracted (400)
    MissingPathParam,
    /// Unknown record or route (404)
    NotFound,
    /// Panic, timeout or other middleware failure (500)
    InternalServerError,
}

impl ErrorKind {
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Returns the HTTP status code for this kind.
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::MissingPathParam => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message used when none is set on the error.
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::MissingPathParam => "Invalid request: missing required parameters",
            Self::NotFound => "Route not found",
            Self::InternalServerError => "Internal server error",
        }
    }

    /// Returns the response envelope with the default message.
    #[inline]
    pub const fn response(self) -> ErrorResponse<'static> {
        ErrorResponse::new(self.default_message(), self.status_code())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(ErrorKind::MissingPathParam.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorKind::InternalServerError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn message_falls_back_to_kind_default() {
        let error = ErrorKind::NotFound.into_error();
        assert_eq!(error.message(), "Route not found");

        let error = ErrorKind::NotFound.with_message("User not found");
        assert_eq!(error.message(), "User not found");
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn context_is_kept_apart_from_message() {
        let error = ErrorKind::NotFound
            .with_message("Product not found")
            .with_context("id: abc");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), "Product not found");
        assert_eq!(error.context(), Some("id: abc"));
        assert_eq!(error.to_string(), "404 not_found: Product not found (id: abc)");
    }

    #[test]
    fn into_static_owns_borrowed_text() {
        let message = String::from("Route not found");
        let error = ErrorKind::NotFound.with_message(message.as_str()).into_static();
        drop(message);

        assert_eq!(error.message(), "Route not found");
    }
}
