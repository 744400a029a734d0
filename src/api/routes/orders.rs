//! Order routes for buyers placing orders and farmers handling them.

use crate::{
    api::{SharedState, extract::Json},
    core::{
        order::{self, OrderSummary},
        plan::{self, FarmerFeature},
        user,
    },
    entities::{OrderModel, OrderStatus},
    errors::{Error, Result},
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;

/// Body of `POST /orders`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Ordering buyer
    pub buyer_id: String,
    /// Product to buy
    pub product_id: String,
    /// Units to buy, at least one
    pub quantity: i32,
}

/// Body of `PATCH /orders/{id}/status`
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// Target status
    pub status: OrderStatus,
}

/// `POST /orders` - the total price is always computed from the product's current price.
async fn place_order(
    State(state): State<SharedState>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderModel>)> {
    user::require_user(&state.database, &request.buyer_id).await?;
    let placed = order::place_order(
        &state.database,
        &request.buyer_id,
        &request.product_id,
        request.quantity,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

async fn get_order(
    State(state): State<SharedState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderModel>> {
    order::get_order_by_id(&state.database, &order_id)
        .await?
        .map(Json)
        .ok_or(Error::OrderNotFound { id: order_id })
}

async fn update_status(
    State(state): State<SharedState>,
    Path(order_id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<OrderModel>> {
    Ok(Json(
        order::update_order_status(&state.database, &order_id, request.status).await?,
    ))
}

async fn buyer_orders(
    State(state): State<SharedState>,
    Path(buyer_id): Path<String>,
) -> Result<Json<Vec<OrderSummary>>> {
    user::require_user(&state.database, &buyer_id).await?;
    Ok(Json(
        order::order_summaries_for_buyer(&state.database, &buyer_id).await?,
    ))
}

/// `GET /farmers/{id}/orders` - incoming orders are a PRO feature.
async fn farmer_orders(
    State(state): State<SharedState>,
    Path(farmer_id): Path<String>,
) -> Result<Json<Vec<OrderSummary>>> {
    let farmer = user::require_user(&state.database, &farmer_id).await?;
    plan::ensure_feature(&farmer, FarmerFeature::IncomingOrders)?;
    Ok(Json(
        order::order_summaries_for_farmer(&state.database, &farmer_id).await?,
    ))
}

/// Order routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/orders", post(place_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", patch(update_status))
        .route("/buyers/{id}/orders", get(buyer_orders))
        .route("/farmers/{id}/orders", get(farmer_orders))
}
