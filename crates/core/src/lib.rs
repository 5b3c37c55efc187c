//! Core business logic for campus-cms.

pub mod services;

pub use services::*;
