//! Visitor repository.

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

use crate::entities::{Visitor, visitor};

/// Visitor repository for database operations.
#[derive(Clone)]
pub struct VisitorRepository {
    db: Arc<DatabaseConnection>,
}

impl VisitorRepository {
    /// Create a new visitor repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a visit.
    pub async fn create(&self, model: visitor::ActiveModel) -> AppResult<visitor::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every recorded visit (dashboard aggregation).
    pub async fn find_all(&self) -> AppResult<Vec<visitor::Model>> {
        Visitor::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
