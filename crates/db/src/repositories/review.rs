//! Review repository.

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

use crate::entities::{Review, review};

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a review belonging to a specific course.
    pub async fn find_by_id_and_course(
        &self,
        id: &str,
        course_id: &str,
    ) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .filter(review::Column::CourseId.eq(course_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Reviews for a course, newest first.
    pub async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::CourseId.eq(course_id))
            .filter(review::Column::DeletedAt.is_null())
            .order_by_desc(review::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every review (dashboard aggregation).
    pub async fn find_all(&self) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::DeletedAt.is_null())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a review.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a review.
    pub async fn delete(&self, model: review::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
