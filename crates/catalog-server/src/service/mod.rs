//! Application state and dependency injection.

mod uptime;

use catalog_cache::CacheClient;
use catalog_core::{Catalog, Products, Users};

pub use crate::service::uptime::Uptime;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // Static data:
    pub users: Users,
    pub products: Products,

    // External services:
    pub cache: CacheClient,

    // Internal services:
    pub uptime: Uptime,
}

impl ServiceState {
    /// Builds the state from a catalog, a running cache client and the
    /// process uptime clock.
    pub fn new(catalog: Catalog, cache: CacheClient, uptime: Uptime) -> Self {
        Self {
            users: catalog.users,
            products: catalog.products,
            cache,
            uptime,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// Static data:
impl_di!(users: Users);
impl_di!(products: Products);

// External services:
impl_di!(cache: CacheClient);

// Internal services:
impl_di!(uptime: Uptime);
