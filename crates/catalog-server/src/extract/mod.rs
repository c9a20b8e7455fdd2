//! Custom request extractors.

mod record_id;

pub use record_id::RecordId;
