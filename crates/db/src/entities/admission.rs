//! Admission round entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    pub start_date: DateTimeWithTimeZone,

    pub end_date: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub selection_start_date: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub selection_end_date: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub training_start_date: Option<DateTimeWithTimeZone>,

    /// External registration form URL.
    #[sea_orm(nullable)]
    pub link_register: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
