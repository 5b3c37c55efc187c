//! Admin account repository.

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{Admin, admin};

/// Admin repository for database operations.
#[derive(Clone)]
pub struct AdminRepository {
    db: Arc<DatabaseConnection>,
}

impl AdminRepository {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an admin by ID. Soft-deleted accounts are excluded.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<admin::Model>> {
        Admin::find_by_id(id)
            .filter(admin::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an admin by username. Soft-deleted accounts are excluded.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<admin::Model>> {
        Admin::find()
            .filter(admin::Column::Username.eq(username))
            .filter(admin::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an admin by email. Soft-deleted accounts are excluded.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<admin::Model>> {
        Admin::find()
            .filter(admin::Column::Email.eq(email))
            .filter(admin::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an admin account.
    pub async fn create(&self, model: admin::ActiveModel) -> AppResult<admin::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an admin account.
    pub async fn update(&self, model: admin::ActiveModel) -> AppResult<admin::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
