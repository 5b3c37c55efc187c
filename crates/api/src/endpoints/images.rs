//! Image gallery endpoints.

use axum::{
    Router,
    extract::{Multipart, OriginalUri, Path, Query, State},
    routing::get,
};
use campus_common::{AppError, AppResult};
use campus_core::ImageResponse;

use crate::extractors::AuthAdmin;
use crate::middleware::AppState;
use crate::pagination::{PageQuery, paginate};
use crate::response::ApiResponse;
use crate::upload::CollectedForm;

/// List gallery images.
async fn list_images(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<ImageResponse>>> {
    let (images, total) = state
        .image_service
        .list(&query.search, query.offset, query.limit)
        .await?;

    let pagination = paginate(&state.base_url, uri.path(), &query, total);
    Ok(ApiResponse::paginated(images, pagination))
}

async fn admin_list_images(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<ImageResponse>>> {
    let (images, total) = state
        .image_service
        .list(&query.search, query.offset, query.limit)
        .await?;

    let pagination = paginate(&state.base_url, uri.path(), &query, total);
    Ok(ApiResponse::paginated(images, pagination))
}

/// Upload a standalone gallery image (multipart field `image`).
async fn upload_image(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<ImageResponse>> {
    let mut form = CollectedForm::read(multipart).await?;

    let part = form
        .take_file("image")
        .ok_or_else(|| AppError::BadRequest("An image file is required".to_string()))?;
    let stored = state
        .storage
        .store_image(&part.field, &part.file_name, &part.data)
        .await?;

    let image = state.image_service.upload(stored).await?;
    Ok(ApiResponse::created("Image uploaded", image))
}

/// Delete a gallery image (row and file).
async fn delete_image(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.image_service.delete(&id).await?;
    Ok(ApiResponse::message("Image deleted"))
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/", get(list_images))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_list_images).post(upload_image))
        .route("/{id}", axum::routing::delete(delete_image))
}
