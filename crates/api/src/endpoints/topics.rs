//! Topic endpoints.

use axum::{
    Json, Router,
    extract::{OriginalUri, Path, Query, State},
    routing::get,
};
use campus_common::AppResult;
use campus_core::{CreateTopicInput, TopicResponse, UpdateTopicInput};

use crate::extractors::AuthAdmin;
use crate::middleware::AppState;
use crate::pagination::{PageQuery, paginate};
use crate::response::ApiResponse;

/// List publicly visible topics with their answers.
async fn list_topics(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<TopicResponse>>> {
    let (topics, total) = state
        .topic_service
        .list(&query.search, true, query.offset, query.limit)
        .await?;

    let pagination = paginate(&state.base_url, uri.path(), &query, total);
    Ok(ApiResponse::paginated(topics, pagination))
}

/// Fetch a publicly visible topic.
async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TopicResponse>> {
    let topic = state.topic_service.get_public(&id).await?;
    Ok(ApiResponse::ok(topic))
}

/// List every topic for the admin surface.
async fn admin_list_topics(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<TopicResponse>>> {
    let (topics, total) = state
        .topic_service
        .list(&query.search, false, query.offset, query.limit)
        .await?;

    let pagination = paginate(&state.base_url, uri.path(), &query, total);
    Ok(ApiResponse::paginated(topics, pagination))
}

async fn admin_get_topic(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TopicResponse>> {
    let topic = state.topic_service.get_admin(&id).await?;
    Ok(ApiResponse::ok(topic))
}

/// Create a topic, optionally with inline answers.
async fn create_topic(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTopicInput>,
) -> AppResult<ApiResponse<TopicResponse>> {
    let topic = state.topic_service.create(input).await?;
    Ok(ApiResponse::created("Topic created", topic))
}

/// Update a topic; a present answer list replaces all stored answers.
async fn update_topic(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTopicInput>,
) -> AppResult<ApiResponse<TopicResponse>> {
    let topic = state.topic_service.update(&id, input).await?;
    Ok(ApiResponse::with_message("Topic updated", topic))
}

/// Delete a topic and its answers.
async fn delete_topic(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.topic_service.delete(&id).await?;
    Ok(ApiResponse::message("Topic deleted"))
}

/// Answers under a topic (admin moderation view).
async fn list_topic_answers(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<campus_core::AnswerResponse>>> {
    let answers = state.topic_service.answers_for_topic(&id).await?;
    Ok(ApiResponse::ok(answers))
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_topics))
        .route("/{id}", get(get_topic))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_list_topics).post(create_topic))
        .route(
            "/{id}",
            get(admin_get_topic).put(update_topic).delete(delete_topic),
        )
        .route("/{id}/answers", get(list_topic_answers))
}
