//! Visitor tracking endpoint.

use std::net::SocketAddr;

use axum::{
    Router,
    extract::{ConnectInfo, State},
    http::HeaderMap,
    routing::post,
};
use campus_common::AppResult;
use campus_core::VisitorResponse;

use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Record a visit from the calling client.
async fn record_visit(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> AppResult<ApiResponse<VisitorResponse>> {
    // Honor the proxy-provided address when present.
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map_or_else(|| addr.ip().to_string(), |v| v.trim().to_string());

    let visit = state.visitor_service.record(&ip).await?;
    Ok(ApiResponse::created("Visit recorded", visit))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(record_visit))
}
