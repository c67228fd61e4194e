//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use echo_ember_core::{OrderId, ProductId, SelectedOptions};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewOrderLine, Order, ShippingDetails, TimelineStep, timeline_for};
use crate::state::AppState;

/// One cart line as submitted by the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLine {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub selected_options: SelectedOptions,
}

/// Order submission payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrder {
    pub items: Vec<SubmitLine>,
    pub shipping: ShippingDetails,
    pub request_token: Option<String>,
}

/// Order submission response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub success: bool,
    pub order_id: OrderId,
    pub total: Decimal,
    /// Products dropped from the order because they no longer exist.
    pub skipped: Vec<ProductId>,
}

/// Order detail with the customer-facing timeline attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub timeline: Vec<TimelineStep>,
    pub cancelled: bool,
}

/// Submit an order from the cart.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<SubmitOrder>,
) -> Result<impl IntoResponse> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("order has no items".to_owned()));
    }
    if payload.items.iter().any(|line| line.quantity == 0) {
        return Err(AppError::BadRequest(
            "item quantity must be at least 1".to_owned(),
        ));
    }

    let missing = payload.shipping.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "missing shipping fields: {}",
            missing.join(", ")
        )));
    }

    let lines: Vec<NewOrderLine> = payload
        .items
        .into_iter()
        .map(|line| NewOrderLine {
            product_id: line.product_id,
            quantity: line.quantity,
            options: line.selected_options,
        })
        .collect();

    let created = OrderRepository::new(state.pool())
        .create(
            user.id,
            &lines,
            &payload.shipping,
            payload.request_token.as_deref(),
        )
        .await?;

    let status = if created.duplicate {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(OrderCreated {
            success: true,
            order_id: created.order_id,
            total: created.total,
            skipped: created.skipped,
        }),
    ))
}

/// List the caller's orders, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(orders))
}

/// Owner-only order detail with the display timeline.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = OrderRepository::new(state.pool())
        .get_for_user(id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_owned()))?;

    let (timeline, cancelled) = timeline_for(order.status);

    Ok(Json(OrderDetail {
        order,
        timeline,
        cancelled,
    }))
}
