//! Event endpoints.

use axum::{
    Router,
    extract::{Multipart, OriginalUri, Path, Query, State},
    routing::get,
};
use campus_common::AppResult;
use campus_core::{CreateEventInput, EventResponse, TagInput, UpdateEventInput};

use crate::extractors::AuthAdmin;
use crate::middleware::AppState;
use crate::pagination::{PageQuery, paginate};
use crate::response::ApiResponse;
use crate::upload::{CollectedForm, parse_datetime, parse_status};

/// List publicly visible events.
async fn list_events(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<EventResponse>>> {
    let (events, total) = state
        .event_service
        .list(&query.search, true, query.offset, query.limit)
        .await?;

    let pagination = paginate(&state.base_url, uri.path(), &query, total);
    Ok(ApiResponse::paginated(events, pagination))
}

/// Fetch a single event.
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<EventResponse>> {
    let event = state.event_service.get(&id).await?;
    Ok(ApiResponse::ok(event))
}

/// List events for the admin surface (hidden ones included).
async fn admin_list_events(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<EventResponse>>> {
    let (events, total) = state
        .event_service
        .list(&query.search, false, query.offset, query.limit)
        .await?;

    let pagination = paginate(&state.base_url, uri.path(), &query, total);
    Ok(ApiResponse::paginated(events, pagination))
}

async fn admin_get_event(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<EventResponse>> {
    let event = state.event_service.get(&id).await?;
    Ok(ApiResponse::ok(event))
}

/// Create an event from a multipart form (`image` file + `tag` list).
async fn create_event(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<EventResponse>> {
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

    let input = CreateEventInput {
        title: form.text("title").unwrap_or_default(),
        description: form.text("description").unwrap_or_default(),
        event_date: form
            .text("event_date")
            .map(|v| parse_datetime(&v))
            .transpose()?,
        status: form.text("status").map(|v| parse_status(&v)).transpose()?,
        tags: form.text("tag").map(|v| TagInput::Text(v).into_names()),
        image,
    };

    let event = state.event_service.create(input).await?;
    Ok(ApiResponse::created("Event created successfully", event))
}

/// Update an event; an uploaded `image` replaces the current one.
async fn update_event(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<EventResponse>> {
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

    let input = UpdateEventInput {
        title: form.text("title"),
        description: form.text("description"),
        event_date: form
            .text("event_date")
            .map(|v| parse_datetime(&v))
            .transpose()?,
        status: form.text("status").map(|v| parse_status(&v)).transpose()?,
        tags: form.text("tag").map(|v| TagInput::Text(v).into_names()),
        image,
    };

    let event = state.event_service.update(&id, input).await?;
    Ok(ApiResponse::with_message("Event updated successfully", event))
}

/// Delete an event and its attachments.
async fn delete_event(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.event_service.delete(&id).await?;
    Ok(ApiResponse::message("Event deleted successfully"))
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events))
        .route("/{id}", get(get_event))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_list_events).post(create_event))
        .route(
            "/{id}",
            get(admin_get_event).put(update_event).delete(delete_event),
        )
}
