//! Image repository.

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{Image, image};

/// Image repository for database operations.
#[derive(Clone)]
pub struct ImageRepository {
    db: Arc<DatabaseConnection>,
}

impl ImageRepository {
    /// Create a new image repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an image by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<image::Model>> {
        Image::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an image by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<image::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image: {id}")))
    }

    /// Find an image by ID on a specific connection (transaction-scoped).
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        db: &C,
        id: &str,
    ) -> AppResult<Option<image::Model>> {
        Image::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn listing_filter(search: &str) -> Condition {
        let mut cond = Condition::all().add(image::Column::DeletedAt.is_null());
        if !search.is_empty() {
            cond = cond.add(image::Column::ImagePath.contains(search));
        }
        cond
    }

    /// Count images matching a path search.
    pub async fn count(&self, search: &str) -> AppResult<u64> {
        Image::find()
            .filter(Self::listing_filter(search))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List images, newest first.
    pub async fn find_page(
        &self,
        search: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<image::Model>> {
        Image::find()
            .filter(Self::listing_filter(search))
            .order_by_desc(image::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an image row.
    pub async fn create<C: ConnectionTrait>(
        &self,
        db: &C,
        model: image::ActiveModel,
    ) -> AppResult<image::Model> {
        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an image row.
    pub async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        model: image::ActiveModel,
    ) -> AppResult<image::Model> {
        model
            .update(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an image row.
    pub async fn delete<C: ConnectionTrait>(&self, db: &C, id: &str) -> AppResult<()> {
        Image::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete every image row owned by an entity (weak-reference cleanup).
    pub async fn delete_for_owner<C: ConnectionTrait>(
        &self,
        db: &C,
        ref_type: &str,
        ref_id: &str,
    ) -> AppResult<()> {
        Image::delete_many()
            .filter(image::Column::RefType.eq(ref_type))
            .filter(image::Column::RefId.eq(ref_id))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
