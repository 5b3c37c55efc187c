//! Topic answer endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use campus_common::AppResult;
use campus_core::{AnswerResponse, CreateAnswerInput, UpdateAnswerInput};

use crate::extractors::AuthAdmin;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Visitor answer on a topic; lands hidden until moderated.
async fn create_public_answer(
    State(state): State<AppState>,
    Json(input): Json<CreateAnswerInput>,
) -> AppResult<ApiResponse<AnswerResponse>> {
    let answer = state.topic_service.create_answer(input, true).await?;
    Ok(ApiResponse::created("Answer submitted", answer))
}

/// Admin answer with explicit status.
async fn create_answer(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAnswerInput>,
) -> AppResult<ApiResponse<AnswerResponse>> {
    let answer = state.topic_service.create_answer(input, false).await?;
    Ok(ApiResponse::created("Answer created", answer))
}

/// Fetch a single answer.
async fn get_answer(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AnswerResponse>> {
    let answer = state.topic_service.get_answer(&id).await?;
    Ok(ApiResponse::ok(answer))
}

/// Update an answer.
async fn update_answer(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateAnswerInput>,
) -> AppResult<ApiResponse<AnswerResponse>> {
    let answer = state.topic_service.update_answer(&id, input).await?;
    Ok(ApiResponse::with_message("Answer updated", answer))
}

/// Delete an answer.
async fn delete_answer(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.topic_service.delete_answer(&id).await?;
    Ok(ApiResponse::message("Answer deleted"))
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/", post(create_public_answer))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_answer))
        .route(
            "/{id}",
            get(get_answer).put(update_answer).delete(delete_answer),
        )
}
