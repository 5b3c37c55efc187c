//! Image entity.
//!
//! Images attach to their owner through a (`ref_type`, `ref_id`) pair — a
//! weak reference with no foreign-key constraint. Owner delete flows are
//! responsible for cleaning these rows up.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner row id; not enforced by the database.
    #[sea_orm(nullable)]
    pub ref_id: Option<String>,

    /// Owner table discriminator (`news`, `event`, `course`, `gallery`).
    #[sea_orm(nullable)]
    pub ref_type: Option<String>,

    /// Path relative to the serving root.
    pub image_path: String,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
