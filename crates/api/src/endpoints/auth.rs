//! Admin account endpoints (unauthenticated surface).

use axum::{Json, Router, extract::State, routing::post};
use campus_common::AppResult;
use campus_core::{
    AdminResponse, CreateAdminInput, LoginInput, LoginResponse, ResetPasswordInput, SendOtpInput,
    VerifyOtpInput,
};

use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Create an admin account.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<CreateAdminInput>,
) -> AppResult<ApiResponse<AdminResponse>> {
    let admin = state.account_service.create(input).await?;
    Ok(ApiResponse::created("Admin created", admin))
}

/// Verify credentials and issue a bearer token.
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let response = state.account_service.login(input).await?;
    Ok(ApiResponse::with_message("Login successful", response))
}

/// Mail a password-reset code.
async fn send_otp(
    State(state): State<AppState>,
    Json(input): Json<SendOtpInput>,
) -> AppResult<ApiResponse<()>> {
    state.account_service.send_otp(input).await?;
    Ok(ApiResponse::message("OTP sent"))
}

/// Verify a mailed reset code.
async fn verify_otp(
    State(state): State<AppState>,
    Json(input): Json<VerifyOtpInput>,
) -> AppResult<ApiResponse<()>> {
    state.account_service.verify_otp(input).await?;
    Ok(ApiResponse::message("OTP verified"))
}

/// Set a new password after a verified code.
async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordInput>,
) -> AppResult<ApiResponse<()>> {
    state.account_service.reset_password(input).await?;
    Ok(ApiResponse::message("Password reset successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
        .route("/reset-password", post(reset_password))
}
