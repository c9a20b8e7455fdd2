#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for dataset construction.
pub const TRACING_TARGET_DATASET: &str = "catalog_core::dataset";

mod catalog;
mod collection;
mod product;
mod user;

pub mod prelude;

pub use catalog::Catalog;
pub use collection::{Collection, Record};
pub use product::{Product, Products};
pub use user::{Role, User, Users};
