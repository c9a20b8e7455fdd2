//! Process health handler.
//!
//! `GET /health` always answers `200 OK` while the server is up; the cache
//! state is reported, not enforced.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use catalog_cache::CacheClient;

use crate::handler::response::HealthStatus;
use crate::service::{ServiceState, Uptime};

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "catalog_server::handler::monitors";

#[tracing::instrument(skip_all)]
async fn health_status(
    State(uptime): State<Uptime>,
    State(cache): State<CacheClient>,
) -> Json<HealthStatus> {
    let response = HealthStatus::now(uptime.seconds(), cache.state());

    tracing::debug!(
        target: TRACING_TARGET,
        uptime = response.uptime,
        cache_service = %response.cache_service,
        "Health status response prepared"
    );

    Json(response)
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use catalog_cache::mock::MockTransport;
    use catalog_cache::{CacheClient, ConnectionState, ReconnectPolicy};
    use catalog_core::Catalog;
    use serde_json::Value;

    use crate::handler::response::HealthStatus;
    use crate::handler::test::{create_test_server, create_test_server_with_state};
    use crate::service::{ServiceState, Uptime};

    #[tokio::test]
    async fn health_reports_ok() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let status = response.json::<HealthStatus>();
        assert_eq!(status.status, "ok");
        assert!(status.uptime >= 0.0);
        assert!(status.timestamp.as_second() > 0);
        Ok(())
    }

    #[tokio::test]
    async fn uptime_counts_from_clock_start() -> anyhow::Result<()> {
        let started_at = Instant::now()
            .checked_sub(Duration::from_secs(5))
            .unwrap();
        let cache = CacheClient::spawn(MockTransport::new(), ReconnectPolicy::default());
        let state = ServiceState::new(Catalog::seeded(), cache, Uptime::since(started_at));
        let server = create_test_server_with_state(state).await?;

        let status = server.get("/health").await.json::<HealthStatus>();
        assert!(status.uptime >= 5.0, "{}", status.uptime);
        Ok(())
    }

    #[tokio::test]
    async fn health_body_uses_camel_case() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let body = server.get("/health").await.json::<Value>();
        assert!(body["timestamp"].is_string());
        assert!(body["uptime"].is_number());
        assert!(body["cacheService"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn health_reports_connected_cache() -> anyhow::Result<()> {
        let cache = CacheClient::spawn(MockTransport::new(), ReconnectPolicy::default());
        cache
            .subscribe()
            .wait_for(|state| state.is_connected())
            .await?;

        let state = ServiceState::new(Catalog::seeded(), cache, Uptime::start());
        let server = create_test_server_with_state(state).await?;

        let status = server.get("/health").await.json::<HealthStatus>();
        assert_eq!(status.cache_service, ConnectionState::Connected);
        Ok(())
    }

    #[tokio::test]
    async fn health_stays_ok_while_cache_is_down() -> anyhow::Result<()> {
        let transport = MockTransport::new();
        transport.fail_next_connects(u32::MAX);

        let cache = CacheClient::spawn(transport, ReconnectPolicy::default());
        cache
            .subscribe()
            .wait_for(|state| *state == ConnectionState::Reconnecting)
            .await?;

        let state = ServiceState::new(Catalog::seeded(), cache, Uptime::start());
        let server = create_test_server_with_state(state).await?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["cacheService"], "reconnecting");
        Ok(())
    }
}
