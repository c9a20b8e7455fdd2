use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::handler::{Error, ErrorKind};

/// Numeric record identifier taken from the `{id}` path segment.
///
/// Parsing is strict: the segment must be a plain non-negative integer that
/// fits in a `u32`. Anything else yields `None`, which handlers report as a
/// missing record rather than a malformed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub Option<u32>);

impl RecordId {
    /// Parses a raw path segment.
    pub fn parse(raw: &str) -> Self {
        Self(raw.parse().ok())
    }

    /// Returns the parsed identifier, if any.
    #[inline]
    pub fn get(self) -> Option<u32> {
        self.0
    }
}

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ErrorKind::MissingPathParam
                    .with_context(rejection.body_text())
                    .into_static()
            })?;

        Ok(Self::parse(&raw))
    }
}
