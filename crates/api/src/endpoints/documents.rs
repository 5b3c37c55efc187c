//! Document resource endpoints, plus the combined document/video listing.

use axum::{
    Router,
    extract::{Multipart, OriginalUri, Path, Query, State},
    response::Response,
    routing::get,
};
use campus_common::{AppError, AppResult};
use campus_core::{CreateResourceInput, ResourceResponse, UpdateResourceInput};
use campus_db::entities::ResourceKind;
use serde::Deserialize;

use crate::extractors::AuthAdmin;
use crate::middleware::AppState;
use crate::pagination::{PageQuery, paginate};
use crate::response::{ApiResponse, file_download};
use crate::upload::{CollectedForm, parse_bool, parse_datetime, parse_i32, parse_status};

/// List publicly visible documents.
async fn list_documents(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<ResourceResponse>>> {
    let (documents, total) = state
        .resource_service
        .list(
            ResourceKind::Document,
            &query.search,
            true,
            query.offset,
            query.limit,
        )
        .await?;

    let pagination = paginate(&state.base_url, uri.path(), &query, total);
    Ok(ApiResponse::paginated(documents, pagination))
}

/// Fetch a single document with its files.
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ResourceResponse>> {
    let document = state
        .resource_service
        .get(&id, ResourceKind::Document)
        .await?;
    Ok(ApiResponse::ok(document))
}

/// Stream the downloadable file behind a document.
async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let (path, name) = state.resource_service.resolve_download(&id).await?;
    file_download(path, name).await
}

/// Query for the combined listing: which kind of resource to return.
#[derive(Debug, Deserialize)]
struct CombinedQuery {
    kind: ResourceKind,
    #[serde(default)]
    offset: u64,
    #[serde(default = "default_limit")]
    limit: u64,
    #[serde(default)]
    search: String,
}

const fn default_limit() -> u64 {
    10
}

/// Combined listing across documents and videos, filtered by kind.
async fn list_combined(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<CombinedQuery>,
) -> AppResult<ApiResponse<Vec<ResourceResponse>>> {
    let (resources, total) = state
        .resource_service
        .list(query.kind, &query.search, true, query.offset, query.limit)
        .await?;

    let page = PageQuery {
        offset: query.offset,
        limit: query.limit,
        search: query.search,
    };
    let pagination = paginate(&state.base_url, uri.path(), &page, total);
    Ok(ApiResponse::paginated(resources, pagination))
}

/// Create a document resource from a multipart form (`document_file`
/// required).
async fn create_document(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<ResourceResponse>> {
    let mut form = CollectedForm::read(multipart).await?;

    let part = form
        .take_file("document_file")
        .ok_or_else(|| AppError::BadRequest("A document file is required".to_string()))?;
    let stored = state
        .storage
        .store_document(&part.field, &part.file_name, &part.data)
        .await?;

    let input = CreateResourceInput {
        title: form.text("title").unwrap_or_default(),
        description: form.text("description"),
        duration: None,
        pages: form.text("pages").map(|v| parse_i32(&v)).transpose()?,
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

    let document = state
        .resource_service
        .create(ResourceKind::Document, input)
        .await?;
    Ok(ApiResponse::created("Document created", document))
}

/// Update a document resource; a new `document_file` repoints the stored
/// file.
async fn update_document(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<ResourceResponse>> {
    let mut form = CollectedForm::read(multipart).await?;

    let file = match form.take_file("document_file") {
        Some(part) => Some(
            state
                .storage
                .store_document(&part.field, &part.file_name, &part.data)
                .await?,
        ),
        None => None,
    };

    let input = UpdateResourceInput {
        title: form.text("title"),
        description: form.text("description"),
        duration: None,
        pages: form.text("pages").map(|v| parse_i32(&v)).transpose()?,
        author: form.text("author"),
        published_date: form
            .text("published_date")
            .map(|v| parse_datetime(&v))
            .transpose()?,
        status: form.text("status").map(|v| parse_status(&v)).transpose()?,
        is_downloadable: form.text("is_downloadable").map(|v| parse_bool(&v)),
        file,
    };

    let document = state.resource_service.update(&id, input).await?;
    Ok(ApiResponse::with_message("Document updated", document))
}

/// Delete a document resource and its file.
async fn delete_document(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.resource_service.delete(&id).await?;
    Ok(ApiResponse::message("Document deleted"))
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents))
        .route("/{id}", get(get_document))
        .route("/{id}/download", get(download_document))
}

pub fn combined_router() -> Router<AppState> {
    Router::new().route("/", get(list_combined))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_document))
        .route(
            "/{id}",
            axum::routing::put(update_document).delete(delete_document),
        )
}
