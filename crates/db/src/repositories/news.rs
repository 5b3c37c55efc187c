//! News repository.

use std::sync::Arc;

use campus_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{News, Visibility, news};

/// News repository for database operations.
#[derive(Clone)]
pub struct NewsRepository {
    db: Arc<DatabaseConnection>,
}

impl NewsRepository {
    /// Create a new news repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an article by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<news::Model>> {
        News::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an article by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<news::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("News: {id}")))
    }

    /// Find an article by ID on a specific connection (transaction-scoped).
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        db: &C,
        id: &str,
    ) -> AppResult<Option<news::Model>> {
        News::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a publicly visible article by ID.
    pub async fn find_visible_by_id(&self, id: &str) -> AppResult<Option<news::Model>> {
        News::find_by_id(id)
            .filter(news::Column::Status.eq(Visibility::Show))
            .filter(news::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn visible_filter(search: &str) -> Condition {
        let mut cond = Condition::all()
            .add(news::Column::Status.eq(Visibility::Show))
            .add(news::Column::DeletedAt.is_null());
        if !search.is_empty() {
            cond = cond.add(
                Condition::any()
                    .add(news::Column::Title.contains(search))
                    .add(news::Column::Content.contains(search)),
            );
        }
        cond
    }

    /// Count publicly visible articles matching a search term.
    pub async fn count_visible(&self, search: &str) -> AppResult<u64> {
        News::find()
            .filter(Self::visible_filter(search))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List publicly visible articles, newest published first.
    pub async fn find_visible(
        &self,
        search: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<news::Model>> {
        News::find()
            .filter(Self::visible_filter(search))
            .order_by_desc(news::Column::PublishedDate)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn admin_filter(search: &str) -> Condition {
        let mut cond = Condition::all().add(news::Column::DeletedAt.is_null());
        if !search.is_empty() {
            cond = cond.add(
                Condition::any()
                    .add(news::Column::Title.contains(search))
                    .add(news::Column::Content.contains(search)),
            );
        }
        cond
    }

    /// Count articles for the admin listing (hidden ones included).
    pub async fn count_all(&self, search: &str) -> AppResult<u64> {
        News::find()
            .filter(Self::admin_filter(search))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List articles for the admin listing, newest first.
    pub async fn find_all(
        &self,
        search: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<news::Model>> {
        News::find()
            .filter(Self::admin_filter(search))
            .order_by_desc(news::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every undeleted article (dashboard aggregation).
    pub async fn find_all_unfiltered(&self) -> AppResult<Vec<news::Model>> {
        News::find()
            .filter(news::Column::DeletedAt.is_null())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an article.
    pub async fn create<C: ConnectionTrait>(
        &self,
        db: &C,
        model: news::ActiveModel,
    ) -> AppResult<news::Model> {
        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an article.
    pub async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        model: news::ActiveModel,
    ) -> AppResult<news::Model> {
        model
            .update(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an article row.
    pub async fn delete<C: ConnectionTrait>(&self, db: &C, id: &str) -> AppResult<()> {
        News::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Bump the read counter without touching the rest of the row.
    pub async fn increment_view_count(&self, id: &str) -> AppResult<()> {
        News::update_many()
            .col_expr(
                news::Column::ViewCount,
                Expr::col(news::Column::ViewCount).add(1),
            )
            .filter(news::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
