//! Event repository.

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{Event, Visibility, event};

/// Event repository for database operations.
#[derive(Clone)]
pub struct EventRepository {
    db: Arc<DatabaseConnection>,
}

impl EventRepository {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<event::Model>> {
        Event::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an event by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<event::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event: {id}")))
    }

    /// Find an event by ID on a specific connection (transaction-scoped).
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        db: &C,
        id: &str,
    ) -> AppResult<Option<event::Model>> {
        Event::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn listing_filter(search: &str, public_only: bool) -> Condition {
        let mut cond = Condition::all().add(event::Column::DeletedAt.is_null());
        if public_only {
            cond = cond.add(event::Column::Status.eq(Visibility::Show));
        }
        if !search.is_empty() {
            cond = cond.add(
                Condition::any()
                    .add(event::Column::Title.contains(search))
                    .add(event::Column::Description.contains(search)),
            );
        }
        cond
    }

    /// Count events matching a search term.
    pub async fn count(&self, search: &str, public_only: bool) -> AppResult<u64> {
        Event::find()
            .filter(Self::listing_filter(search, public_only))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List events, most recent event date first.
    pub async fn find_page(
        &self,
        search: &str,
        public_only: bool,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<event::Model>> {
        Event::find()
            .filter(Self::listing_filter(search, public_only))
            .order_by_desc(event::Column::EventDate)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an event.
    pub async fn create<C: ConnectionTrait>(
        &self,
        db: &C,
        model: event::ActiveModel,
    ) -> AppResult<event::Model> {
        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an event.
    pub async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        model: event::ActiveModel,
    ) -> AppResult<event::Model> {
        model
            .update(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an event row.
    pub async fn delete<C: ConnectionTrait>(&self, db: &C, id: &str) -> AppResult<()> {
        Event::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
