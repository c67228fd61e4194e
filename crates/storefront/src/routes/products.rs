//! Catalog route handlers (read-only).

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use echo_ember_core::{Category, ProductId};

use crate::db::{ProductRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Catalog listing filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Category filter, case-insensitive.
    pub category: Option<String>,
    /// Case-insensitive contains match on the title.
    pub q: Option<String>,
}

/// Product detail payload with the review aggregate attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub average_rating: Option<Decimal>,
    pub review_count: i64,
}

/// List products, optionally filtered.
///
/// An unknown category name yields an empty list rather than an error; the
/// storefront treats it as a filter that matches nothing.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let category = match query.category.as_deref().map(str::parse::<Category>) {
        None => None,
        Some(Ok(category)) => Some(category),
        Some(Err(_)) => return Ok(Json(Vec::<Product>::new())),
    };

    let products = ProductRepository::new(state.pool())
        .list(category, query.q.as_deref())
        .await?;

    Ok(Json(products))
}

/// Product detail with option groups, gallery and rating aggregate.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    let summary = ReviewRepository::new(state.pool())
        .summary_for_product(id)
        .await?;

    Ok(Json(ProductDetail {
        product,
        average_rating: summary.average,
        review_count: summary.count,
    }))
}
