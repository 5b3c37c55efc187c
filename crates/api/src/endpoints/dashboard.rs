//! Admin dashboard endpoint.

use axum::{Router, extract::State, routing::get};
use campus_common::AppResult;
use campus_core::DashboardResponse;

use crate::extractors::AuthAdmin;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Full dashboard recompute.
async fn get_dashboard(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DashboardResponse>> {
    let dashboard = state.dashboard_service.compute().await?;
    Ok(ApiResponse::ok(dashboard))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}
