//! Topic repository, including the answers under a topic.

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{Topic, TopicAnswer, Visibility, topic, topic_answer};

/// Topic repository for database operations.
#[derive(Clone)]
pub struct TopicRepository {
    db: Arc<DatabaseConnection>,
}

impl TopicRepository {
    /// Create a new topic repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a topic by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<topic::Model>> {
        Topic::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a topic by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<topic::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Topic: {id}")))
    }

    /// Find a publicly visible topic by ID.
    pub async fn find_visible_by_id(&self, id: &str) -> AppResult<Option<topic::Model>> {
        Topic::find_by_id(id)
            .filter(topic::Column::Status.eq(Visibility::Show))
            .filter(topic::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn listing_filter(search: &str, public_only: bool) -> Condition {
        let mut cond = Condition::all().add(topic::Column::DeletedAt.is_null());
        if public_only {
            cond = cond.add(topic::Column::Status.eq(Visibility::Show));
        }
        if !search.is_empty() {
            cond = cond.add(
                Condition::any()
                    .add(topic::Column::Title.contains(search))
                    .add(topic::Column::PostedBy.contains(search)),
            );
        }
        cond
    }

    /// Count topics matching a search term.
    pub async fn count(&self, search: &str, public_only: bool) -> AppResult<u64> {
        Topic::find()
            .filter(Self::listing_filter(search, public_only))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List topics, newest first.
    pub async fn find_page(
        &self,
        search: &str,
        public_only: bool,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<topic::Model>> {
        Topic::find()
            .filter(Self::listing_filter(search, public_only))
            .order_by_desc(topic::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a topic.
    pub async fn create<C: ConnectionTrait>(
        &self,
        db: &C,
        model: topic::ActiveModel,
    ) -> AppResult<topic::Model> {
        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a topic.
    pub async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        model: topic::ActiveModel,
    ) -> AppResult<topic::Model> {
        model
            .update(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a topic row.
    pub async fn delete<C: ConnectionTrait>(&self, db: &C, id: &str) -> AppResult<()> {
        Topic::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // === Answers ===

    /// Answers under a topic, oldest first.
    pub async fn answers_for(&self, topic_id: &str) -> AppResult<Vec<topic_answer::Model>> {
        TopicAnswer::find()
            .filter(topic_answer::Column::TopicId.eq(topic_id))
            .order_by_asc(topic_answer::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Answers under a topic on a specific connection.
    pub async fn answers_for_in<C: ConnectionTrait>(
        &self,
        db: &C,
        topic_id: &str,
    ) -> AppResult<Vec<topic_answer::Model>> {
        TopicAnswer::find()
            .filter(topic_answer::Column::TopicId.eq(topic_id))
            .all(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every answer (dashboard aggregation).
    pub async fn find_all_answers(&self) -> AppResult<Vec<topic_answer::Model>> {
        TopicAnswer::find()
            .filter(topic_answer::Column::DeletedAt.is_null())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an answer by ID.
    pub async fn find_answer_by_id(&self, id: &str) -> AppResult<Option<topic_answer::Model>> {
        TopicAnswer::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an answer by ID, returning an error if not found.
    pub async fn get_answer_by_id(&self, id: &str) -> AppResult<topic_answer::Model> {
        self.find_answer_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Answer: {id}")))
    }

    /// Create an answer.
    pub async fn create_answer<C: ConnectionTrait>(
        &self,
        db: &C,
        model: topic_answer::ActiveModel,
    ) -> AppResult<topic_answer::Model> {
        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an answer.
    pub async fn update_answer<C: ConnectionTrait>(
        &self,
        db: &C,
        model: topic_answer::ActiveModel,
    ) -> AppResult<topic_answer::Model> {
        model
            .update(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete one answer row.
    pub async fn delete_answer<C: ConnectionTrait>(&self, db: &C, id: &str) -> AppResult<()> {
        TopicAnswer::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove every answer under a topic.
    pub async fn delete_answers_for<C: ConnectionTrait>(
        &self,
        db: &C,
        topic_id: &str,
    ) -> AppResult<()> {
        TopicAnswer::delete_many()
            .filter(topic_answer::Column::TopicId.eq(topic_id))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
