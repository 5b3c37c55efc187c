//! Admission round endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use campus_common::AppResult;
use campus_core::{AdmissionInput, AdmissionResponse};

use crate::extractors::AuthAdmin;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// All rounds, earliest start first.
async fn list_admissions(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AdmissionResponse>>> {
    let rounds = state.admission_service.list().await?;
    Ok(ApiResponse::ok(rounds))
}

/// Rounds whose registration window covers today.
async fn list_active_admissions(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AdmissionResponse>>> {
    let rounds = state.admission_service.list_active().await?;
    Ok(ApiResponse::ok(rounds))
}

async fn admin_list_admissions(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AdmissionResponse>>> {
    let rounds = state.admission_service.list().await?;
    Ok(ApiResponse::ok(rounds))
}

/// Create an admission round.
async fn create_admission(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Json(input): Json<AdmissionInput>,
) -> AppResult<ApiResponse<AdmissionResponse>> {
    let round = state.admission_service.create(input).await?;
    Ok(ApiResponse::created("Admission created", round))
}

/// Replace an admission round.
async fn update_admission(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AdmissionInput>,
) -> AppResult<ApiResponse<AdmissionResponse>> {
    let round = state.admission_service.update(&id, input).await?;
    Ok(ApiResponse::with_message("Admission updated", round))
}

/// Delete an admission round.
async fn delete_admission(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.admission_service.delete(&id).await?;
    Ok(ApiResponse::message("Admission deleted"))
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admissions))
        .route("/active", get(list_active_admissions))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_list_admissions).post(create_admission))
        .route(
            "/{id}",
            axum::routing::put(update_admission).delete(delete_admission),
        )
}
