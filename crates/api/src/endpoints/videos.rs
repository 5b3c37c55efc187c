//! Video resource endpoints.

use axum::{
    Router,
    extract::{Multipart, OriginalUri, Path, Query, State},
    response::Response,
    routing::get,
};
use campus_common::{AppError, AppResult};
use campus_core::{CreateResourceInput, ResourceResponse, UpdateResourceInput};
use campus_db::entities::ResourceKind;

use crate::extractors::AuthAdmin;
use crate::middleware::AppState;
use crate::pagination::{PageQuery, paginate};
use crate::response::{ApiResponse, file_download};
use crate::upload::{CollectedForm, parse_bool, parse_datetime, parse_status};

/// List publicly visible videos.
async fn list_videos(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<ResourceResponse>>> {
    let (videos, total) = state
        .resource_service
        .list(ResourceKind::Video, &query.search, true, query.offset, query.limit)
        .await?;

    let pagination = paginate(&state.base_url, uri.path(), &query, total);
    Ok(ApiResponse::paginated(videos, pagination))
}

/// Fetch a single video with its files.
async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ResourceResponse>> {
    let video = state.resource_service.get(&id, ResourceKind::Video).await?;
    Ok(ApiResponse::ok(video))
}

/// Stream the downloadable file behind a video.
async fn download_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let (path, name) = state.resource_service.resolve_download(&id).await?;
    file_download(path, name).await
}

/// Create a video resource from a multipart form (`video_file` required).
async fn create_video(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<ResourceResponse>> {
    let mut form = CollectedForm::read(multipart).await?;

    let part = form
        .take_file("video_file")
        .ok_or_else(|| AppError::BadRequest("A video file is required".to_string()))?;
    let stored = state
        .storage
        .store_video(&part.field, &part.file_name, &part.data)
        .await?;

    let input = CreateResourceInput {
        title: form.text("title").unwrap_or_default(),
        description: form.text("description"),
        duration: form.text("duration"),
        pages: None,
        author: form.text("author"),
        published_date: form
            .text("published_date")
            .map(|v| parse_datetime(&v))
            .transpose()?,
        status: form.text("status").map(|v| parse_status(&v)).transpose()?,
        is_downloadable: form
            .text("is_downloadable")
            .is_some_and(|v| parse_bool(&v)),
        file: stored,
    };

    let video = state
        .resource_service
        .create(ResourceKind::Video, input)
        .await?;
    Ok(ApiResponse::created("Video created", video))
}

/// Update a video resource; a new `video_file` repoints the stored file.
async fn update_video(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<ResourceResponse>> {
    let mut form = CollectedForm::read(multipart).await?;

    let file = match form.take_file("video_file") {
        Some(part) => Some(
            state
                .storage
                .store_video(&part.field, &part.file_name, &part.data)
                .await?,
        ),
        None => None,
    };

    let input = UpdateResourceInput {
        title: form.text("title"),
        description: form.text("description"),
        duration: form.text("duration"),
        pages: None,
        author: form.text("author"),
        published_date: form
            .text("published_date")
            .map(|v| parse_datetime(&v))
            .transpose()?,
        status: form.text("status").map(|v| parse_status(&v)).transpose()?,
        is_downloadable: form.text("is_downloadable").map(|v| parse_bool(&v)),
        file,
    };

    let video = state.resource_service.update(&id, input).await?;
    Ok(ApiResponse::with_message("Video updated", video))
}

/// Delete a video resource and its file.
async fn delete_video(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.resource_service.delete(&id).await?;
    Ok(ApiResponse::message("Video deleted"))
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos))
        .route("/{id}", get(get_video))
        .route("/{id}/download", get(download_video))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_video))
        .route(
            "/{id}",
            axum::routing::put(update_video).delete(delete_video),
        )
}
