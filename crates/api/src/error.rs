//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reservation::ReservationError;
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The authenticated-owner header is missing or not a UUID.
    MissingOwner,
    /// Bad request from the client.
    BadRequest(String),
    /// Resource not found.
    NotFound(String),
    /// The reservation engine refused or failed the order.
    Reservation(ReservationError),
    /// A read-side store failure.
    Store(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingOwner => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": "missing or invalid x-owner-id header" }),
            ),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg }))
            }
            ApiError::Reservation(err) => reservation_error_to_response(err),
            ApiError::Store(err) => store_error_to_response(err),
        };

        (status, axum::Json(body)).into_response()
    }
}

fn reservation_error_to_response(err: ReservationError) -> (StatusCode, serde_json::Value) {
    match &err {
        ReservationError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": err.to_string() }),
        ),
        ReservationError::ProductNotFound(product_id) => (
            StatusCode::NOT_FOUND,
            serde_json::json!({
                "error": err.to_string(),
                "product_id": product_id,
            }),
        ),
        ReservationError::InsufficientStock {
            product_id,
            requested,
            available,
        } => (
            StatusCode::CONFLICT,
            serde_json::json!({
                "error": err.to_string(),
                "product_id": product_id,
                "requested": requested,
                "available": available,
            }),
        ),
        ReservationError::Transient(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({
                "error": err.to_string(),
                "retryable": true,
            }),
        ),
        ReservationError::Fatal(_) => {
            tracing::error!(error = %err, "reservation failed fatally");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "internal server error" }),
            )
        }
    }
}

fn store_error_to_response(err: StoreError) -> (StatusCode, serde_json::Value) {
    if err.is_transient() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({
                "error": err.to_string(),
                "retryable": true,
            }),
        )
    } else {
        tracing::error!(error = %err, "store read failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": "internal server error" }),
        )
    }
}

impl From<ReservationError> for ApiError {
    fn from(err: ReservationError) -> Self {
        ApiError::Reservation(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}
