//! Convenient re-exports for common use.

pub use crate::catalog::Catalog;
pub use crate::collection::{Collection, Record};
pub use crate::product::{Product, Products};
pub use crate::user::{Role, User, Users};
