//! Order placement and retrieval endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use common::{OrderId, OwnerId, ProductId};
use domain::{CartLine, Order};
use futures_util::TryStreamExt;
use query::OrderQueries;
use reservation::ReservationEngine;
use serde::{Deserialize, Serialize};
use store::CommerceStore;
use uuid::Uuid;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub engine: ReservationEngine,
    pub queries: OrderQueries,
    pub store: CommerceStore,
}

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<CartLineRequest>,
}

#[derive(Deserialize)]
pub struct CartLineRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub owner_id: String,
    pub status: String,
    pub total_cents: i64,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub price_per_unit_cents: i64,
    pub total_price_cents: i64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| OrderItemResponse {
                product_id: item.product_id.to_string(),
                quantity: item.quantity,
                price_per_unit_cents: item.price_per_unit.cents(),
                total_price_cents: item.total_price.cents(),
            })
            .collect();

        OrderResponse {
            id: order.id.to_string(),
            owner_id: order.owner_id.to_string(),
            status: order.status.to_string(),
            total_cents: order.total_amount.cents(),
            created_at: order.created_at.to_rfc3339(),
            items,
        }
    }
}

/// Reads the authenticated owner placed in `x-owner-id` by the upstream
/// auth layer. The engine trusts this identity.
fn owner_from_headers(headers: &HeaderMap) -> Result<OwnerId, ApiError> {
    headers
        .get("x-owner-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .map(OwnerId::from_uuid)
        .ok_or(ApiError::MissingOwner)
}

// -- Handlers --

/// POST /orders — place an order from the submitted cart.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<OrderResponse>), ApiError> {
    let owner = owner_from_headers(&headers)?;

    let lines: Vec<CartLine> = req
        .items
        .into_iter()
        .map(|line| CartLine::new(ProductId::from_uuid(line.product_id), line.quantity))
        .collect();

    let order = state.engine.place_order(owner, lines).await?;

    Ok((axum::http::StatusCode::CREATED, Json(order.into())))
}

/// GET /orders — list the caller's orders, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let owner = owner_from_headers(&headers)?;

    let orders: Vec<Order> = state
        .queries
        .orders_for_owner(owner)
        .await?
        .try_collect()
        .await?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// GET /orders/:id — one of the caller's orders with its items.
#[tracing::instrument(skip(state, headers))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let owner = owner_from_headers(&headers)?;
    let order_id = parse_order_id(&id)?;

    let order = state
        .queries
        .order_for_owner(owner, order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("order {id} not found")))?;

    Ok(Json(order.into()))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("invalid order id: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
