//! Course endpoints.

use axum::{
    Router,
    extract::{Multipart, OriginalUri, Path, Query, State},
    routing::{delete, get},
};
use campus_common::AppResult;
use campus_core::{
    CourseResponse, CreateCourseInput, IndustryResponse, TagInput, UpdateCourseInput,
};
use serde::Serialize;

use crate::extractors::AuthAdmin;
use crate::middleware::AppState;
use crate::pagination::{PageQuery, Pagination, paginate};
use crate::response::ApiResponse;
use crate::upload::{CollectedForm, parse_bool};

/// Course listing payload: page of courses plus every industry label.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CourseListing {
    courses: Vec<CourseResponse>,
    industries: Vec<IndustryResponse>,
}

async fn list_courses_inner(
    state: &AppState,
    path: &str,
    query: &PageQuery,
) -> AppResult<(CourseListing, Pagination)> {
    let (courses, industries, total) = state
        .course_service
        .list(&query.search, query.offset, query.limit)
        .await?;

    let pagination = paginate(&state.base_url, path, query, total);
    Ok((
        CourseListing {
            courses,
            industries,
        },
        pagination,
    ))
}

/// List courses with associations.
async fn list_courses(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<CourseListing>> {
    let (listing, pagination) = list_courses_inner(&state, uri.path(), &query).await?;
    Ok(ApiResponse::paginated(listing, pagination))
}

/// Fetch a single course with associations.
async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CourseResponse>> {
    let course = state.course_service.get(&id).await?;
    Ok(ApiResponse::ok(course))
}

async fn admin_list_courses(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<CourseListing>> {
    let (listing, pagination) = list_courses_inner(&state, uri.path(), &query).await?;
    Ok(ApiResponse::paginated(listing, pagination))
}

async fn admin_get_course(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CourseResponse>> {
    let course = state.course_service.get(&id).await?;
    Ok(ApiResponse::ok(course))
}

/// Create a course from a multipart form (`image` + `video` files,
/// `industries` list).
async fn create_course(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<CourseResponse>> {
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
    let video = match form.take_file("video") {
        Some(part) => Some(
            state
                .storage
                .store_video(&part.field, &part.file_name, &part.data)
                .await?,
        ),
        None => None,
    };

    let input = CreateCourseInput {
        name: form.text("name").unwrap_or_default(),
        description: form.text("description"),
        sub_description: form.text("sub_description"),
        additional_info: form.text("additional_info"),
        instructor: form.text("instructor"),
        is_downloadable: form
            .text("is_downloadable")
            .is_some_and(|v| parse_bool(&v)),
        industries: form
            .text("industries")
            .map(|v| TagInput::Text(v).into_names())
            .unwrap_or_default(),
        image,
        video,
    };

    let course = state.course_service.create(input).await?;
    Ok(ApiResponse::created("Course created successfully", course))
}

/// Update a course; uploaded `image`/`video` files replace the old slots.
async fn update_course(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<CourseResponse>> {
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
    let video = match form.take_file("video") {
        Some(part) => Some(
            state
                .storage
                .store_video(&part.field, &part.file_name, &part.data)
                .await?,
        ),
        None => None,
    };

    let input = UpdateCourseInput {
        name: form.text("name"),
        description: form.text("description"),
        sub_description: form.text("sub_description"),
        additional_info: form.text("additional_info"),
        instructor: form.text("instructor"),
        is_downloadable: form.text("is_downloadable").map(|v| parse_bool(&v)),
        industries: form
            .text("industries")
            .map(|v| TagInput::Text(v).into_names()),
        image,
        video,
    };

    let course = state.course_service.update(&id, input).await?;
    Ok(ApiResponse::with_message(
        "Course updated successfully",
        course,
    ))
}

/// Delete a course and everything hanging off it.
async fn delete_course(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.course_service.delete(&id).await?;
    Ok(ApiResponse::message("Course deleted successfully"))
}

/// Remove a review from a course.
async fn delete_review(
    AuthAdmin(_claims): AuthAdmin,
    State(state): State<AppState>,
    Path((course_id, review_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<()>> {
    state.review_service.delete(&course_id, &review_id).await?;
    Ok(ApiResponse::message("Review deleted successfully"))
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/{id}", get(get_course))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_list_courses).post(create_course))
        .route(
            "/{id}",
            get(admin_get_course)
                .put(update_course)
                .delete(delete_course),
        )
        .route(
            "/{course_id}/reviews/{review_id}",
            delete(delete_review),
        )
}
