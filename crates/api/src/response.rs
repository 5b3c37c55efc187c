//! API response envelope.
//!
//! Write endpoints answer `{ "message", "data" }`; listings answer
//! `{ "data", "pagination" }`. Absent parts are omitted from the JSON.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::pagination::Pagination;

/// Standard API response wrapper.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    message: Option<String>,
    data: Option<T>,
    pagination: Option<Pagination>,
}

#[derive(Serialize)]
struct Body<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Plain 200 with data.
    pub const fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: None,
            data: Some(data),
            pagination: None,
        }
    }

    /// 201 with a message and the created representation.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: Some(message.into()),
            data: Some(data),
            pagination: None,
        }
    }

    /// 200 with a message and data.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: Some(message.into()),
            data: Some(data),
            pagination: None,
        }
    }

    /// 200 listing with pagination links.
    pub const fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            status: StatusCode::OK,
            message: None,
            data: Some(data),
            pagination: Some(pagination),
        }
    }
}

impl ApiResponse<()> {
    /// 200 carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            message: Some(message.into()),
            data: None,
            pagination: None,
        }
    }
}

/// Serve a stored file as an attachment download.
pub async fn file_download(
    path: std::path::PathBuf,
    file_name: String,
) -> campus_common::AppResult<Response> {
    let data = tokio::fs::read(&path)
        .await
        .map_err(|_| campus_common::AppError::NotFound("File not found on disk".to_string()))?;

    let headers = [
        (
            axum::http::header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (
            axum::http::header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];

    Ok((headers, data).into_response())
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Body {
            message: self.message,
            data: self.data,
            pagination: self.pagination,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_only_body_skips_data() {
        let body = Body::<()> {
            message: Some("done".to_string()),
            data: None,
            pagination: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "done" }));
    }

    #[test]
    fn test_created_status() {
        let response = ApiResponse::created("News created", serde_json::json!({"id": "n1"}));
        assert_eq!(response.status, StatusCode::CREATED);
    }
}
