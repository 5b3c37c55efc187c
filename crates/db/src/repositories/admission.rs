//! Admission round repository.

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::{Admission, admission};

/// Admission repository for database operations.
#[derive(Clone)]
pub struct AdmissionRepository {
    db: Arc<DatabaseConnection>,
}

impl AdmissionRepository {
    /// Create a new admission repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an admission round by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<admission::Model>> {
        Admission::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an admission round by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<admission::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Admission: {id}")))
    }

    /// All rounds, earliest start date first.
    pub async fn find_all(&self) -> AppResult<Vec<admission::Model>> {
        Admission::find()
            .filter(admission::Column::DeletedAt.is_null())
            .order_by_asc(admission::Column::StartDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Rounds whose registration window covers the given instant.
    pub async fn find_active(&self, now: DateTime<Utc>) -> AppResult<Vec<admission::Model>> {
        Admission::find()
            .filter(admission::Column::DeletedAt.is_null())
            .filter(admission::Column::StartDate.lte(now))
            .filter(admission::Column::EndDate.gte(now))
            .order_by_asc(admission::Column::StartDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an admission round.
    pub async fn create(&self, model: admission::ActiveModel) -> AppResult<admission::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an admission round.
    pub async fn update(&self, model: admission::ActiveModel) -> AppResult<admission::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an admission round.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Admission::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
