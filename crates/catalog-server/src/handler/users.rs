//! User collection handlers.

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;
use catalog_core::{User, Users};

use crate::extract::RecordId;
use crate::handler::response::ApiResponse;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for user operations.
const TRACING_TARGET: &str = "catalog_server::handler::users";

/// Lists every user.
#[tracing::instrument(skip_all)]
async fn list_users(State(users): State<Users>) -> Json<ApiResponse<Vec<User>>> {
    tracing::debug!(target: TRACING_TARGET, count = users.len(), "Listing users");
    Json(ApiResponse::new(users.all().to_vec()))
}

/// Returns one user by id.
#[tracing::instrument(skip_all, fields(id = ?id.get()))]
async fn read_user(
    State(users): State<Users>,
    id: RecordId,
) -> Result<Json<ApiResponse<User>>> {
    let Some(user) = id.get().and_then(|id| users.find_by_id(id)) else {
        tracing::debug!(target: TRACING_TARGET, "User not found");
        return Err(ErrorKind::NotFound.with_message("User not found"));
    };

    Ok(Json(ApiResponse::new(user.clone())))
}

/// Lists users whose role matches exactly.
#[tracing::instrument(skip_all, fields(role = %role))]
async fn list_users_by_role(
    State(users): State<Users>,
    Path(role): Path<String>,
) -> Json<ApiResponse<Vec<User>>> {
    let matched: Vec<User> = users.filter_by_role(&role).into_iter().cloned().collect();
    tracing::debug!(target: TRACING_TARGET, count = matched.len(), "Listing users by role");
    Json(ApiResponse::new(matched))
}

/// Returns a [`Router`] with all user routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", get(read_user))
        .route("/api/users/role/{role}", get(list_users_by_role))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn list_returns_all_users() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/api/users").await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"].as_array().map(Vec::len), Some(4));
        Ok(())
    }

    #[tokio::test]
    async fn read_existing_user() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/api/users/1").await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "success": true,
            "data": {
                "id": 1,
                "name": "Anurag",
                "email": "anurag@example.com",
                "role": "admin"
            }
        }));
        Ok(())
    }

    #[tokio::test]
    async fn read_missing_user() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        for path in ["/api/users/999", "/api/users/abc", "/api/users/-1"] {
            let response = server.get(path).await;
            response.assert_status_not_found();
            response.assert_json(&json!({ "success": false, "message": "User not found" }));
        }
        Ok(())
    }

    #[tokio::test]
    async fn filter_by_role() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/api/users/role/admin").await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        let ids: Vec<_> = body["data"]
            .as_array()
            .into_iter()
            .flatten()
            .map(|user| user["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(1), json!(4)]);

        let response = server.get("/api/users/role/superadmin").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "success": true, "data": [] }));
        Ok(())
    }
}
