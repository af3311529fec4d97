//! Catalog read endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::ProductId;
use domain::Product;
use serde::Serialize;
use store::catalog;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::orders::AppState;

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price_cents: i64,
    pub stock: u32,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id.to_string(),
            name: product.name,
            category: product.category.to_string(),
            description: product.description,
            price_cents: product.price.cents(),
            stock: product.stock,
        }
    }
}

/// GET /products — the whole catalog, alphabetically.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = catalog::list_products(state.store.pool()).await?;
    Ok(Json(
        products.into_iter().map(ProductResponse::from).collect(),
    ))
}

/// GET /products/:id — one catalog entry.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let uuid = Uuid::parse_str(&id)
        .map_err(|e| ApiError::BadRequest(format!("invalid product id: {e}")))?;

    let product = catalog::get_product(state.store.pool(), ProductId::from_uuid(uuid))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id} not found")))?;

    Ok(Json(product.into()))
}
