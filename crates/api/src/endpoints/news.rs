//! News endpoints.

use axum::{
    Router,
    extract::{Multipart, OriginalUri, Path, Query, State},
    routing::get,
};
use campus_common::AppResult;
use campus_core::{CreateNewsInput, NewsResponse, TagInput, UpdateNewsInput};

use crate::extractors::AuthAdmin;
use crate::middleware::AppState;
use crate::pagination::{PageQuery, paginate};
use crate::response::ApiResponse;
use crate::upload::{CollectedForm, parse_datetime, parse_status};

/// List publicly visible articles.
async fn list_news(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<NewsResponse>>> {
    let (articles, total) = state
        .news_service
        .list_public(&query.search, query.offset, query.limit)
        .await?;

    let pagination = paginate(&state.base_url, uri.path(), &query, total);
    Ok(ApiResponse::paginated(articles, pagination))
}

/// Fetch a publicly visible article.
async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<NewsResponse>> {
    let article = state.news_service.get_public(&id).await?;
    Ok(ApiResponse::ok(article))
}

/// List articles for the admin surface (hidden ones included).
async fn admin_list_news(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<NewsResponse>>> {
    let (articles, total) = state
        .news_service
        .list_admin(&query.search, query.offset, query.limit)
        .await?;

    let pagination = paginate(&state.base_url, uri.path(), &query, total);
    Ok(ApiResponse::paginated(articles, pagination))
}

/// Fetch an article regardless of visibility.
async fn admin_get_news(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<NewsResponse>> {
    let article = state.news_service.get_admin(&id).await?;
    Ok(ApiResponse::ok(article))
}

/// Create an article from a multipart form (`image` file + `tag` list).
async fn create_news(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<NewsResponse>> {
    let mut form = CollectedForm::read(multipart).await?;

    let image = match form.take_file("image") {
        Some(part) => Some(
            state
                .storage
                .store_image(&part.field, &part.file_name, &part.data)
                .await?,
        ),
        None => None,
    };

    let input = CreateNewsInput {
        title: form.text("title").unwrap_or_default(),
        content: form.text("content").unwrap_or_default(),
        short_description: form.text("short_description"),
        published_date: form
            .text("published_date")
            .map(|v| parse_datetime(&v))
            .transpose()?,
        status: form.text("status").map(|v| parse_status(&v)).transpose()?,
        tags: form.text("tag").map(|v| TagInput::Text(v).into_names()),
        image,
    };

    let article = state.news_service.create(input).await?;
    Ok(ApiResponse::created("News created", article))
}

/// Update an article; an uploaded `image` replaces the current one.
async fn update_news(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<NewsResponse>> {
    let mut form = CollectedForm::read(multipart).await?;

    let image = match form.take_file("image") {
        Some(part) => Some(
            state
                .storage
                .store_image(&part.field, &part.file_name, &part.data)
                .await?,
        ),
        None => None,
    };

    let input = UpdateNewsInput {
        title: form.text("title"),
        content: form.text("content"),
        short_description: form.text("short_description"),
        published_date: form
            .text("published_date")
            .map(|v| parse_datetime(&v))
            .transpose()?,
        status: form.text("status").map(|v| parse_status(&v)).transpose()?,
        tags: form.text("tag").map(|v| TagInput::Text(v).into_names()),
        image,
    };

    let article = state.news_service.update(&id, input).await?;
    Ok(ApiResponse::with_message("News updated", article))
}

/// Delete an article and its attachments.
async fn delete_news(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.news_service.delete(&id).await?;
    Ok(ApiResponse::message("News deleted"))
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_news))
        .route("/{id}", get(get_news))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_list_news).post(create_news))
        .route(
            "/{id}",
            get(admin_get_news).put(update_news).delete(delete_news),
        )
}
