//! HTTP API layer for campus-cms.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: public content surface plus the bearer-protected admin
//!   namespace
//! - **Extractors**: admin authentication, client address
//! - **Middleware**: bearer-token verification with a development bypass
//! - **Pagination**: offset arithmetic and prev/next link building
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod pagination;
pub mod response;
pub mod upload;

pub use endpoints::router;
pub use middleware::AppState;
