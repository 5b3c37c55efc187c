//! Database entities.

pub mod admin;
pub mod admission;
pub mod course;
pub mod event;
pub mod image;
pub mod industry;
pub mod news;
pub mod resource;
pub mod resource_file;
pub mod review;
pub mod tag;
pub mod tag_assignment;
pub mod topic;
pub mod topic_answer;
pub mod visitor;

pub use admin::Entity as Admin;
pub use admission::Entity as Admission;
pub use course::Entity as Course;
pub use event::Entity as Event;
pub use image::Entity as Image;
pub use industry::Entity as Industry;
pub use news::Entity as News;
pub use resource::Entity as Resource;
pub use resource_file::Entity as ResourceFile;
pub use review::Entity as Review;
pub use tag::Entity as Tag;
pub use tag_assignment::Entity as TagAssignment;
pub use topic::Entity as Topic;
pub use topic_answer::Entity as TopicAnswer;
pub use visitor::Entity as Visitor;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Publication state shared by content entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible on the public surface.
    #[sea_orm(string_value = "show")]
    Show,
    /// Hidden from the public surface.
    #[sea_orm(string_value = "hide")]
    Hide,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Hide
    }
}

/// Kind discriminator for resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A video resource.
    #[sea_orm(string_value = "video")]
    Video,
    /// A downloadable document.
    #[sea_orm(string_value = "document")]
    Document,
}

/// Progress of an admin password-reset attempt.
///
/// Explicit state instead of inferring progress from which OTP columns
/// happen to be null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum OtpState {
    /// No reset in progress.
    #[sea_orm(string_value = "none")]
    None,
    /// A code has been issued and mailed, awaiting verification.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// The code was verified; a password reset is permitted.
    #[sea_orm(string_value = "verified")]
    Verified,
}

impl Default for OtpState {
    fn default() -> Self {
        Self::None
    }
}
