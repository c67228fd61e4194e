//! Review route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use echo_ember_core::ProductId;

use crate::db::ReviewRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewReview, Review};
use crate::state::AppState;

/// Review listing with the aggregate the product page shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListing {
    pub reviews: Vec<Review>,
    pub average_rating: Option<Decimal>,
    pub review_count: i64,
}

/// Review submission payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReview {
    pub rating: u8,
    pub comment: String,
}

/// List a product's reviews, newest first, with the computed average.
pub async fn index(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let repo = ReviewRepository::new(state.pool());
    let reviews = repo.list_for_product(product_id).await?;
    let summary = repo.summary_for_product(product_id).await?;

    Ok(Json(ReviewListing {
        reviews,
        average_rating: summary.average,
        review_count: summary.count,
    }))
}

/// Append a review. The reviewer's display name is captured from the
/// session at submission time.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
    Json(payload): Json<SubmitReview>,
) -> Result<impl IntoResponse> {
    let review = NewReview {
        product_id,
        user_id: user.id,
        user_name: user
            .name
            .clone()
            .unwrap_or_else(|| user.email.as_str().to_owned()),
        rating: payload.rating,
        comment: payload.comment,
    };

    if let Some(reason) = review.validation_error() {
        return Err(AppError::Unprocessable(reason.to_owned()));
    }

    let created = ReviewRepository::new(state.pool()).create(&review).await?;

    Ok((StatusCode::CREATED, Json(created)))
}
