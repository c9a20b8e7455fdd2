//! Shared middleware constants.

/// Maximum request body size: 10 KiB.
///
/// The API is read-only; anything larger is rejected with `413`.
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024;
