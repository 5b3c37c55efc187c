//! Review endpoints.

use axum::{Json, Router, extract::State, routing::post};
use campus_common::AppResult;
use campus_core::{CreateReviewInput, ReviewResponse};

use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Visitor review of a course.
async fn create_review(
    State(state): State<AppState>,
    Json(input): Json<CreateReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.create(input).await?;
    Ok(ApiResponse::created("Review submitted", review))
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/", post(create_review))
}
