//! Tag repository, covering tags and their polymorphic assignments.
//!
//! All methods take an explicit connection so that tag reconciliation can
//! run inside the owning entity's transaction.

use std::sync::Arc;

use campus_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

use crate::entities::{Tag, TagAssignment, tag, tag_assignment};

/// Tag repository for database operations.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// The shared connection, for callers operating outside a transaction.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Find a tag by name.
    pub async fn find_by_name<C: ConnectionTrait>(
        &self,
        db: &C,
        name: &str,
    ) -> AppResult<Option<tag::Model>> {
        Tag::find()
            .filter(tag::Column::Name.eq(name))
            .one(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a tag by name, inserting it when absent.
    pub async fn find_or_create<C: ConnectionTrait>(
        &self,
        db: &C,
        name: &str,
    ) -> AppResult<tag::Model> {
        if let Some(existing) = self.find_by_name(db, name).await? {
            return Ok(existing);
        }

        let model = tag::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
            deleted_at: Set(None),
        };

        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Assignments for a taggable entity, each paired with its tag.
    pub async fn assignments_for<C: ConnectionTrait>(
        &self,
        db: &C,
        taggable_type: &str,
        taggable_id: &str,
    ) -> AppResult<Vec<(tag_assignment::Model, Option<tag::Model>)>> {
        TagAssignment::find()
            .filter(tag_assignment::Column::TaggableType.eq(taggable_type))
            .filter(tag_assignment::Column::TaggableId.eq(taggable_id))
            .find_also_related(Tag)
            .all(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Tag names attached to a taggable entity.
    pub async fn names_for<C: ConnectionTrait>(
        &self,
        db: &C,
        taggable_type: &str,
        taggable_id: &str,
    ) -> AppResult<Vec<String>> {
        let assignments = self.assignments_for(db, taggable_type, taggable_id).await?;
        Ok(assignments
            .into_iter()
            .filter_map(|(_, t)| t.map(|t| t.name))
            .collect())
    }

    /// Attach a tag to a taggable entity.
    pub async fn create_assignment<C: ConnectionTrait>(
        &self,
        db: &C,
        tag_id: &str,
        taggable_type: &str,
        taggable_id: &str,
    ) -> AppResult<tag_assignment::Model> {
        let model = tag_assignment::ActiveModel {
            id: Set(self.id_gen.generate()),
            tag_id: Set(tag_id.to_string()),
            taggable_id: Set(taggable_id.to_string()),
            taggable_type: Set(taggable_type.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
            deleted_at: Set(None),
        };

        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove one assignment row.
    pub async fn delete_assignment<C: ConnectionTrait>(&self, db: &C, id: &str) -> AppResult<()> {
        TagAssignment::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove every assignment for a taggable entity (weak-reference cleanup).
    pub async fn delete_assignments_for<C: ConnectionTrait>(
        &self,
        db: &C,
        taggable_type: &str,
        taggable_id: &str,
    ) -> AppResult<()> {
        TagAssignment::delete_many()
            .filter(tag_assignment::Column::TaggableType.eq(taggable_type))
            .filter(tag_assignment::Column::TaggableId.eq(taggable_id))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
