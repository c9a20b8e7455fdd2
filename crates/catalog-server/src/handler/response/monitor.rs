use catalog_cache::ConnectionState;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Always `"ok"` while the process is serving
    pub status: String,
    /// Time the report was produced
    pub timestamp: Timestamp,
    /// Seconds since the process started
    pub uptime: f64,
    /// Current cache-service connection state
    pub cache_service: ConnectionState,
}

impl HealthStatus {
    /// Builds a report stamped with the current time.
    pub fn now(uptime: f64, cache_service: ConnectionState) -> Self {
        Self {
            status: "ok".to_owned(),
            timestamp: Timestamp::now(),
            uptime,
            cache_service,
        }
    }
}
