//! Inventory ledger endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use order_store::{InventorySnapshot, OrderStore};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::orders::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub total_quantity: i64,
    pub price: Decimal,
}

// -- Handlers --

/// GET /api/inventory: the current inventory snapshot.
#[tracing::instrument(skip(state))]
pub async fn current<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<InventorySnapshot>, ApiError> {
    let snapshot = state
        .order_service
        .ledger()
        .current()
        .await?
        .ok_or_else(|| ApiError::NotFound("No inventory data available".to_string()))?;

    Ok(Json(snapshot))
}

/// POST /api/inventory: record a new snapshot (stock level and unit price).
#[tracing::instrument(skip(state, payload))]
pub async fn restock<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<RestockRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InventorySnapshot>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let snapshot = state
        .order_service
        .ledger()
        .restock(req.total_quantity, req.price)
        .await?;

    Ok((StatusCode::CREATED, Json(snapshot)))
}
