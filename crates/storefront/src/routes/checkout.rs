//! Checkout quote handler.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use echo_ember_core::shipping_for_subtotal;

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    #[serde(default)]
    pub subtotal: Decimal,
}

/// Shipping quote for a cart subtotal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub free_shipping_threshold: Decimal,
    /// Shipping actually charged for this subtotal (zero at or above the
    /// threshold).
    pub shipping: Decimal,
    pub total: Decimal,
}

/// Quote shipping for a subtotal from the cached site settings.
pub async fn quote(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> Result<impl IntoResponse> {
    let settings = state.site_settings().await?;

    let shipping = shipping_for_subtotal(
        query.subtotal,
        settings.shipping_cost,
        settings.free_shipping_threshold,
    );

    Ok(Json(Quote {
        subtotal: query.subtotal,
        shipping_cost: settings.shipping_cost,
        free_shipping_threshold: settings.free_shipping_threshold,
        shipping,
        total: query.subtotal + shipping,
    }))
}
