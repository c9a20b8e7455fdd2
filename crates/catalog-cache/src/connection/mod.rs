//! Connection state and reconnect policy.

mod policy;
mod state;

pub use policy::ReconnectPolicy;
pub use state::ConnectionState;
pub(crate) use state::StateCell;
