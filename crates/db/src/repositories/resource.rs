//! Resource repository (documents and videos plus their physical files).

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{Resource, ResourceFile, ResourceKind, Visibility, resource, resource_file};

/// Resource repository for database operations.
#[derive(Clone)]
pub struct ResourceRepository {
    db: Arc<DatabaseConnection>,
}

impl ResourceRepository {
    /// Create a new resource repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a resource by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<resource::Model>> {
        Resource::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a resource by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<resource::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resource: {id}")))
    }

    /// Find a resource of a specific kind by ID.
    pub async fn find_by_id_and_kind(
        &self,
        id: &str,
        kind: ResourceKind,
    ) -> AppResult<Option<resource::Model>> {
        Resource::find_by_id(id)
            .filter(resource::Column::Kind.eq(kind))
            .filter(resource::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn listing_filter(kind: ResourceKind, search: &str, public_only: bool) -> Condition {
        let mut cond = Condition::all()
            .add(resource::Column::Kind.eq(kind))
            .add(resource::Column::DeletedAt.is_null());
        if public_only {
            cond = cond.add(resource::Column::Status.eq(Visibility::Show));
        }
        if !search.is_empty() {
            cond = cond.add(resource::Column::Title.contains(search));
        }
        cond
    }

    /// Count resources of a kind matching a search term.
    pub async fn count(
        &self,
        kind: ResourceKind,
        search: &str,
        public_only: bool,
    ) -> AppResult<u64> {
        Resource::find()
            .filter(Self::listing_filter(kind, search, public_only))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List resources of a kind, newest first.
    pub async fn find_page(
        &self,
        kind: ResourceKind,
        search: &str,
        public_only: bool,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<resource::Model>> {
        Resource::find()
            .filter(Self::listing_filter(kind, search, public_only))
            .order_by_desc(resource::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a resource.
    pub async fn create<C: ConnectionTrait>(
        &self,
        db: &C,
        model: resource::ActiveModel,
    ) -> AppResult<resource::Model> {
        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a resource.
    pub async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        model: resource::ActiveModel,
    ) -> AppResult<resource::Model> {
        model
            .update(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a resource row.
    pub async fn delete<C: ConnectionTrait>(&self, db: &C, id: &str) -> AppResult<()> {
        Resource::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // === Files ===

    /// Files attached to a resource.
    pub async fn files_for(&self, resource_id: &str) -> AppResult<Vec<resource_file::Model>> {
        ResourceFile::find()
            .filter(resource_file::Column::ResourceId.eq(resource_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// First file attached to a resource, if any.
    pub async fn find_file_for(&self, resource_id: &str) -> AppResult<Option<resource_file::Model>> {
        ResourceFile::find()
            .filter(resource_file::Column::ResourceId.eq(resource_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// First file attached to a resource on a specific connection.
    pub async fn find_file_for_in<C: ConnectionTrait>(
        &self,
        db: &C,
        resource_id: &str,
    ) -> AppResult<Option<resource_file::Model>> {
        ResourceFile::find()
            .filter(resource_file::Column::ResourceId.eq(resource_id))
            .one(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// First downloadable file attached to a resource, if any.
    pub async fn find_downloadable_file(
        &self,
        resource_id: &str,
    ) -> AppResult<Option<resource_file::Model>> {
        ResourceFile::find()
            .filter(resource_file::Column::ResourceId.eq(resource_id))
            .filter(resource_file::Column::IsDownloadable.eq(true))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attach a file to a resource.
    pub async fn create_file<C: ConnectionTrait>(
        &self,
        db: &C,
        model: resource_file::ActiveModel,
    ) -> AppResult<resource_file::Model> {
        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an attached file.
    pub async fn update_file<C: ConnectionTrait>(
        &self,
        db: &C,
        model: resource_file::ActiveModel,
    ) -> AppResult<resource_file::Model> {
        model
            .update(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove every file attached to a resource.
    pub async fn delete_files_for<C: ConnectionTrait>(
        &self,
        db: &C,
        resource_id: &str,
    ) -> AppResult<()> {
        ResourceFile::delete_many()
            .filter(resource_file::Column::ResourceId.eq(resource_id))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
