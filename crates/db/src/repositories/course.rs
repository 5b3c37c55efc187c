//! Course repository, including the industry labels hanging off a course.

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{Course, Industry, course, industry};

/// Course repository for database operations.
#[derive(Clone)]
pub struct CourseRepository {
    db: Arc<DatabaseConnection>,
}

impl CourseRepository {
    /// Create a new course repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a course by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<course::Model>> {
        Course::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a course by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<course::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course: {id}")))
    }

    /// Find a course by ID on a specific connection (transaction-scoped).
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        db: &C,
        id: &str,
    ) -> AppResult<Option<course::Model>> {
        Course::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn listing_filter(search: &str) -> Condition {
        let mut cond = Condition::all().add(course::Column::DeletedAt.is_null());
        if !search.is_empty() {
            cond = cond.add(course::Column::Name.contains(search));
        }
        cond
    }

    /// Count undeleted courses matching a search term.
    pub async fn count(&self, search: &str) -> AppResult<u64> {
        Course::find()
            .filter(Self::listing_filter(search))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List courses, newest first.
    pub async fn find_page(
        &self,
        search: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<course::Model>> {
        Course::find()
            .filter(Self::listing_filter(search))
            .order_by_desc(course::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every undeleted course (dashboard aggregation).
    pub async fn find_all(&self) -> AppResult<Vec<course::Model>> {
        Course::find()
            .filter(course::Column::DeletedAt.is_null())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a course.
    pub async fn create<C: ConnectionTrait>(
        &self,
        db: &C,
        model: course::ActiveModel,
    ) -> AppResult<course::Model> {
        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a course.
    pub async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        model: course::ActiveModel,
    ) -> AppResult<course::Model> {
        model
            .update(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a course row.
    pub async fn delete<C: ConnectionTrait>(&self, db: &C, id: &str) -> AppResult<()> {
        Course::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // === Industries ===

    /// Industry labels for a course.
    pub async fn industries_for(&self, course_id: &str) -> AppResult<Vec<industry::Model>> {
        Industry::find()
            .filter(industry::Column::CourseId.eq(course_id))
            .order_by_asc(industry::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Industry labels for a course on a specific connection.
    pub async fn industries_for_in<C: ConnectionTrait>(
        &self,
        db: &C,
        course_id: &str,
    ) -> AppResult<Vec<industry::Model>> {
        Industry::find()
            .filter(industry::Column::CourseId.eq(course_id))
            .all(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All industry labels (admin listing sidebar).
    pub async fn all_industries(&self) -> AppResult<Vec<industry::Model>> {
        Industry::find()
            .order_by_asc(industry::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attach an industry label.
    pub async fn create_industry<C: ConnectionTrait>(
        &self,
        db: &C,
        model: industry::ActiveModel,
    ) -> AppResult<industry::Model> {
        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a single industry label.
    pub async fn delete_industry<C: ConnectionTrait>(&self, db: &C, id: &str) -> AppResult<()> {
        Industry::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove every industry label for a course.
    pub async fn delete_industries_for<C: ConnectionTrait>(
        &self,
        db: &C,
        course_id: &str,
    ) -> AppResult<()> {
        Industry::delete_many()
            .filter(industry::Column::CourseId.eq(course_id))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
