//! API endpoints.

mod admissions;
mod answers;
mod auth;
mod courses;
mod dashboard;
mod documents;
mod events;
mod images;
mod news;
mod reviews;
mod topics;
mod videos;
mod visitors;

use axum::{Router, middleware};

use crate::middleware::{AppState, admin_auth_middleware};

/// Create the API router with its state applied.
pub fn router(state: AppState) -> Router {
    let admin_protected = Router::new()
        .nest("/news", news::admin_router())
        .nest("/events", events::admin_router())
        .nest("/courses", courses::admin_router())
        .nest("/topics", topics::admin_router())
        .nest("/answers", answers::admin_router())
        .nest("/videos", videos::admin_router())
        .nest("/documents", documents::admin_router())
        .nest("/images", images::admin_router())
        .nest("/admissions", admissions::admin_router())
        .nest("/dashboard", dashboard::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    let admin = Router::new().merge(auth::router()).merge(admin_protected);

    let api = Router::new()
        .nest("/news", news::public_router())
        .nest("/events", events::public_router())
        .nest("/courses", courses::public_router())
        .nest("/topics", topics::public_router())
        .nest("/answers", answers::public_router())
        .nest("/reviews", reviews::public_router())
        .nest("/videos", videos::public_router())
        .nest("/documents", documents::public_router())
        .nest("/resources", documents::combined_router())
        .nest("/images", images::public_router())
        .nest("/admissions", admissions::public_router())
        .nest("/visitors", visitors::router())
        .nest("/admin", admin);

    Router::new().nest("/api", api).with_state(state)
}
