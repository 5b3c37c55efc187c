//! Admin account entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::OtpState;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Bcrypt hash; never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[sea_orm(nullable)]
    pub email: Option<String>,

    /// Current reset code while a reset is pending.
    #[sea_orm(nullable)]
    #[serde(skip_serializing)]
    pub otp_code: Option<String>,

    #[sea_orm(nullable)]
    pub otp_expiry: Option<DateTimeWithTimeZone>,

    pub otp_state: OtpState,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,

    /// Admin accounts soft-delete; lookups exclude marked rows.
    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
