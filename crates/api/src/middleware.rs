//! API middleware and application state.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use campus_common::StorageService;
use campus_core::{
    AccountService, AdminClaims, AdmissionService, CourseService, DashboardService, EventService,
    ImageService, NewsService, ResourceService, ReviewService, TopicService, VisitorService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub news_service: NewsService,
    pub event_service: EventService,
    pub course_service: CourseService,
    pub resource_service: ResourceService,
    pub topic_service: TopicService,
    pub review_service: ReviewService,
    pub image_service: ImageService,
    pub admission_service: AdmissionService,
    pub account_service: AccountService,
    pub dashboard_service: DashboardService,
    pub visitor_service: VisitorService,
    pub storage: StorageService,
    /// Public origin used when building pagination links.
    pub base_url: String,
    /// Startup-only development bypass for bearer verification.
    pub skip_auth: bool,
}

/// Admin authentication middleware.
///
/// Verified claims land in the request extensions; the `AuthAdmin`
/// extractor turns their absence into a 401. With `skip_auth` set a
/// synthetic development identity is injected instead.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if state.skip_auth {
        req.extensions_mut().insert(AdminClaims {
            sub: "dev".to_string(),
            username: "dev".to_string(),
            role: "admin".to_string(),
            exp: i64::MAX,
        });
        return next.run(req).await;
    }

    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(claims) = state.account_service.verify_token(token)
    {
        req.extensions_mut().insert(claims);
    }

    next.run(req).await
}
