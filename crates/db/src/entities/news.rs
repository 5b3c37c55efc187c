//! News article entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Visibility;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "news")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Teaser shown in listings.
    #[sea_orm(nullable)]
    pub short_description: Option<String>,

    #[sea_orm(nullable)]
    pub published_date: Option<DateTimeWithTimeZone>,

    pub status: Visibility,

    /// Read counter, bumped on public detail fetches.
    #[sea_orm(default_value = 0)]
    pub view_count: i32,

    /// Primary image slot.
    #[sea_orm(nullable)]
    pub img_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::image::Entity",
        from = "Column::ImgId",
        to = "super::image::Column::Id",
        on_delete = "SetNull"
    )]
    Image,
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
