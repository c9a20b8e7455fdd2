//! Product collection handlers.

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;
use catalog_core::{Product, Products};

use crate::extract::RecordId;
use crate::handler::response::ApiResponse;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for product operations.
const TRACING_TARGET: &str = "catalog_server::handler::products";

#[tracing::instrument(skip_all)]
async fn list_products(State(products): State<Products>) -> Json<ApiResponse<Vec<Product>>> {
    tracing::debug!(target: TRACING_TARGET, count = products.len(), "Listing products");
    Json(ApiResponse::new(products.all().to_vec()))
}

#[tracing::instrument(skip_all)]
async fn list_products_in_stock(
    State(products): State<Products>,
) -> Json<ApiResponse<Vec<Product>>> {
    let matched: Vec<Product> = products.in_stock().into_iter().cloned().collect();
    tracing::debug!(target: TRACING_TARGET, count = matched.len(), "Listing products in stock");
    Json(ApiResponse::new(matched))
}

#[tracing::instrument(skip_all, fields(id = ?id.get()))]
async fn read_product(
    State(products): State<Products>,
    id: RecordId,
) -> Result<Json<ApiResponse<Product>>> {
    let Some(product) = id.get().and_then(|id| products.find_by_id(id)) else {
        tracing::debug!(target: TRACING_TARGET, "Product not found");
        return Err(ErrorKind::NotFound.with_message("Product not found"));
    };

    Ok(Json(ApiResponse::new(product.clone())))
}

#[tracing::instrument(skip_all, fields(category = %category))]
async fn list_products_by_category(
    State(products): State<Products>,
    Path(category): Path<String>,
) -> Json<ApiResponse<Vec<Product>>> {
    let matched: Vec<Product> = products
        .filter_by_category(&category)
        .into_iter()
        .cloned()
        .collect();
    tracing::debug!(target: TRACING_TARGET, count = matched.len(), "Listing products by category");
    Json(ApiResponse::new(matched))
}

/// Returns a [`Router`] with all product routes.
///
/// `/api/products/in-stock` is a literal segment and wins over `{id}`.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/in-stock", get(list_products_in_stock))
        .route("/api/products/{id}", get(read_product))
        .route("/api/products/category/{category}", get(list_products_by_category))
}
