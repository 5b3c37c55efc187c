//! Resource entity (logical document/video record).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ResourceKind, Visibility};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resource")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub kind: ResourceKind,

    /// Playback duration for videos, free-form.
    #[sea_orm(nullable)]
    pub duration: Option<String>,

    /// Page count for documents.
    #[sea_orm(nullable)]
    pub pages: Option<i32>,

    #[sea_orm(nullable)]
    pub author: Option<String>,

    #[sea_orm(nullable)]
    pub published_date: Option<DateTimeWithTimeZone>,

    pub status: Visibility,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::resource_file::Entity")]
    Files,
}

impl Related<super::resource_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
