//! Order placement and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use common::OrderId;
use domain::{Money, OrderService, PlaceOrderRequest};
use order_store::{OrderRecord, OrderStore, OrderSummary};
use serde::Serialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub order_service: OrderService<S>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderSavedResponse {
    pub message: &'static str,
    pub order_id: OrderId,
    pub total_price: Money,
    pub order: OrderRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_stock: Option<i64>,
}

// -- Handlers --

/// POST /api/save_order: price, record and (for pending orders) draw down
/// inventory in one transaction.
#[tracing::instrument(skip(state, payload))]
pub async fn save<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<Json<OrderSavedResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    tracing::debug!(?request, "received save order request");

    let placed = state.order_service.place_order(request).await?;

    Ok(Json(OrderSavedResponse {
        message: "Order saved successfully",
        order_id: placed.order_id,
        total_price: placed.total_price,
        order: placed.order,
        remaining_stock: placed.remaining_stock,
    }))
}

/// GET /api/get_order: list all orders with customer names.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderSummary>>, ApiError> {
    let orders = state.order_service.list_orders().await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}: load one order.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderSummary>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .order_service
        .get_order(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    id.parse::<i64>()
        .map(OrderId::new)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
