//! News service.
//!
//! Create/update/delete persist the article row, its image slot, and its tag
//! assignments as one transaction; either everything lands or nothing does.
//! Physical files are only removed after a successful commit.

use std::sync::Arc;

use campus_common::{AppError, AppResult, IdGenerator, StorageService, StoredFile};
use campus_db::entities::{Visibility, image, news};
use campus_db::in_transaction;
use campus_db::repositories::{ImageRepository, NewsRepository};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set};
use serde::Serialize;

use crate::services::tagging::{TagResponse, TaggingService};

/// Taggable discriminator for news rows.
const TAGGABLE_TYPE: &str = "news";

/// Input for creating a news article.
#[derive(Debug, Default)]
pub struct CreateNewsInput {
    pub title: String,
    pub content: String,
    pub short_description: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub status: Option<Visibility>,
    pub tags: Option<Vec<String>>,
    pub image: Option<StoredFile>,
}

/// Input for updating a news article. `None` leaves a field untouched.
#[derive(Debug, Default)]
pub struct UpdateNewsInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub short_description: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub status: Option<Visibility>,
    pub tags: Option<Vec<String>>,
    pub image: Option<StoredFile>,
}

/// Image slot as it appears in responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsImageResponse {
    pub id: String,
    pub image_path: String,
}

/// A news article as it appears in API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub short_description: Option<String>,
    pub published_date: Option<String>,
    pub status: Visibility,
    pub view_count: i32,
    pub image: Option<NewsImageResponse>,
    pub tags: Vec<TagResponse>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// News service for business logic.
#[derive(Clone)]
pub struct NewsService {
    db: Arc<DatabaseConnection>,
    news_repo: NewsRepository,
    image_repo: ImageRepository,
    tagging: TaggingService,
    storage: StorageService,
    id_gen: IdGenerator,
}

impl NewsService {
    /// Create a new news service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        news_repo: NewsRepository,
        image_repo: ImageRepository,
        tagging: TaggingService,
        storage: StorageService,
    ) -> Self {
        Self {
            db,
            news_repo,
            image_repo,
            tagging,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an article together with its image and tag assignments.
    pub async fn create(&self, input: CreateNewsInput) -> AppResult<NewsResponse> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if input.content.is_empty() {
            return Err(AppError::Validation("Content is required".to_string()));
        }

        let news_id = self.id_gen.generate();
        let image_id = input.image.as_ref().map(|_| self.id_gen.generate());

        let news_repo = self.news_repo.clone();
        let image_repo = self.image_repo.clone();
        let tagging = self.tagging.clone();

        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let now = Utc::now();

                let image = if let (Some(stored), Some(image_id)) = (&input.image, &image_id) {
                    let model = image::ActiveModel {
                        id: Set(image_id.clone()),
                        ref_id: Set(Some(news_id.clone())),
                        ref_type: Set(Some(TAGGABLE_TYPE.to_string())),
                        image_path: Set(stored.path.clone()),
                        created_at: Set(now.into()),
                        updated_at: Set(None),
                        deleted_at: Set(None),
                    };
                    Some(image_repo.create(txn, model).await?)
                } else {
                    None
                };

                let model = news::ActiveModel {
                    id: Set(news_id.clone()),
                    title: Set(title),
                    content: Set(input.content),
                    short_description: Set(input.short_description),
                    published_date: Set(input.published_date.map(Into::into)),
                    status: Set(input.status.unwrap_or_default()),
                    view_count: Set(0),
                    img_id: Set(image_id),
                    created_at: Set(now.into()),
                    updated_at: Set(None),
                    deleted_at: Set(None),
                };
                let article = news_repo.create(txn, model).await?;

                if let Some(tags) = &input.tags {
                    tagging.reconcile(txn, TAGGABLE_TYPE, &news_id, tags).await?;
                }

                let tags = tagging.tags_for(txn, TAGGABLE_TYPE, &news_id).await?;
                Ok(build_response(article, image, tags))
            })
        })
        .await
    }

    /// Update an article; a new image replaces the old slot entirely.
    pub async fn update(&self, id: &str, input: UpdateNewsInput) -> AppResult<NewsResponse> {
        let new_image_id = input.image.as_ref().map(|_| self.id_gen.generate());
        let id = id.to_string();

        let news_repo = self.news_repo.clone();
        let image_repo = self.image_repo.clone();
        let tagging = self.tagging.clone();

        let (response, old_image_path) = in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let article = news_repo
                    .find_by_id_in(txn, &id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("News not found".to_string()))?;

                let old_img_id = article.img_id.clone();
                let mut active: news::ActiveModel = article.into();

                if let Some(title) = input.title {
                    let title = title.trim().to_string();
                    if title.is_empty() {
                        return Err(AppError::Validation("Title is required".to_string()));
                    }
                    active.title = Set(title);
                }
                if let Some(content) = input.content {
                    active.content = Set(content);
                }
                if let Some(short_description) = input.short_description {
                    active.short_description = Set(Some(short_description));
                }
                if let Some(published_date) = input.published_date {
                    active.published_date = Set(Some(published_date.into()));
                }
                if let Some(status) = input.status {
                    active.status = Set(status);
                }

                // Replace, don't merge: the image slot points at exactly one row.
                let mut old_image_path = None;
                let mut image = None;
                if let (Some(stored), Some(image_id)) = (&input.image, &new_image_id) {
                    if let Some(old_id) = &old_img_id
                        && let Some(old) = image_repo.find_by_id_in(txn, old_id).await?
                    {
                        old_image_path = Some(old.image_path.clone());
                        image_repo.delete(txn, &old.id).await?;
                    }

                    let model = image::ActiveModel {
                        id: Set(image_id.clone()),
                        ref_id: Set(Some(id.clone())),
                        ref_type: Set(Some(TAGGABLE_TYPE.to_string())),
                        image_path: Set(stored.path.clone()),
                        created_at: Set(Utc::now().into()),
                        updated_at: Set(None),
                        deleted_at: Set(None),
                    };
                    image = Some(image_repo.create(txn, model).await?);
                    active.img_id = Set(Some(image_id.clone()));
                }

                active.updated_at = Set(Some(Utc::now().into()));
                let article = news_repo.update(txn, active).await?;

                if let Some(tags) = &input.tags {
                    tagging.reconcile(txn, TAGGABLE_TYPE, &id, tags).await?;
                }

                // Resolve the image slot when it was not replaced this call.
                if image.is_none()
                    && let Some(img_id) = &article.img_id
                {
                    image = image_repo.find_by_id_in(txn, img_id).await?;
                }

                let tags = tagging.tags_for(txn, TAGGABLE_TYPE, &id).await?;
                Ok((build_response(article, image, tags), old_image_path))
            })
        })
        .await?;

        if let Some(path) = old_image_path {
            self.storage.delete_best_effort(&path).await;
        }

        Ok(response)
    }

    /// Delete an article together with its image rows and tag assignments.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = id.to_string();
        let news_repo = self.news_repo.clone();
        let image_repo = self.image_repo.clone();
        let tagging = self.tagging.clone();

        let image_paths = in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let article = news_repo
                    .find_by_id_in(txn, &id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("News not found".to_string()))?;

                let mut paths = Vec::new();
                if let Some(img_id) = &article.img_id
                    && let Some(img) = image_repo.find_by_id_in(txn, img_id).await?
                {
                    paths.push(img.image_path.clone());
                    image_repo.delete(txn, &img.id).await?;
                }

                image_repo.delete_for_owner(txn, TAGGABLE_TYPE, &id).await?;
                tagging.clear(txn, TAGGABLE_TYPE, &id).await?;
                news_repo.delete(txn, &id).await?;

                Ok(paths)
            })
        })
        .await?;

        for path in image_paths {
            self.storage.delete_best_effort(&path).await;
        }

        Ok(())
    }

    /// List publicly visible articles.
    pub async fn list_public(
        &self,
        search: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<NewsResponse>, u64)> {
        let total = self.news_repo.count_visible(search).await?;
        let articles = self.news_repo.find_visible(search, offset, limit).await?;
        let responses = self.assemble(articles).await?;
        Ok((responses, total))
    }

    /// Fetch a publicly visible article and bump its read counter.
    pub async fn get_public(&self, id: &str) -> AppResult<NewsResponse> {
        let article = self
            .news_repo
            .find_visible_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("News not found or not visible".to_string()))?;

        self.news_repo.increment_view_count(id).await?;

        let mut responses = self.assemble(vec![article]).await?;
        let mut response = responses
            .pop()
            .ok_or_else(|| AppError::Internal("Empty assembly".to_string()))?;
        response.view_count += 1;
        Ok(response)
    }

    /// List every undeleted article for the admin surface.
    pub async fn list_admin(
        &self,
        search: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<NewsResponse>, u64)> {
        let total = self.news_repo.count_all(search).await?;
        let articles = self.news_repo.find_all(search, offset, limit).await?;
        let responses = self.assemble(articles).await?;
        Ok((responses, total))
    }

    /// Fetch an article regardless of visibility.
    pub async fn get_admin(&self, id: &str) -> AppResult<NewsResponse> {
        let article = self.news_repo.get_by_id(id).await?;
        let mut responses = self.assemble(vec![article]).await?;
        responses
            .pop()
            .ok_or_else(|| AppError::Internal("Empty assembly".to_string()))
    }

    async fn assemble(&self, articles: Vec<news::Model>) -> AppResult<Vec<NewsResponse>> {
        let conn = self.db.as_ref();
        let mut responses = Vec::with_capacity(articles.len());
        for article in articles {
            let image = match &article.img_id {
                Some(img_id) => self.image_repo.find_by_id(img_id).await?,
                None => None,
            };
            let tags = self.tagging.tags_for(conn, TAGGABLE_TYPE, &article.id).await?;
            responses.push(build_response(article, image, tags));
        }
        Ok(responses)
    }
}

fn build_response(
    article: news::Model,
    image: Option<image::Model>,
    tags: Vec<TagResponse>,
) -> NewsResponse {
    NewsResponse {
        id: article.id,
        title: article.title,
        content: article.content,
        short_description: article.short_description,
        published_date: article.published_date.map(|d| d.to_rfc3339()),
        status: article.status,
        view_count: article.view_count,
        image: image.map(|i| NewsImageResponse {
            id: i.id,
            image_path: i.image_path,
        }),
        tags,
        created_at: article.created_at.to_rfc3339(),
        updated_at: article.updated_at.map(|d| d.to_rfc3339()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campus_common::config::StorageConfig;
    use campus_db::repositories::TagRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn make_article(id: &str, title: &str) -> news::Model {
        news::Model {
            id: id.to_string(),
            title: title.to_string(),
            content: "content".to_string(),
            short_description: None,
            published_date: None,
            status: Visibility::Show,
            view_count: 3,
            img_id: None,
            created_at: Utc::now().into(),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn service_over(db: sea_orm::DatabaseConnection) -> NewsService {
        let db = Arc::new(db);
        NewsService::new(
            Arc::clone(&db),
            NewsRepository::new(Arc::clone(&db)),
            ImageRepository::new(Arc::clone(&db)),
            TaggingService::new(TagRepository::new(Arc::clone(&db))),
            StorageService::new(&StorageConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_over(db);

        let result = service
            .create(CreateNewsInput {
                title: "  ".to_string(),
                content: "body".to_string(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_admin_assembles_response() {
        let article = make_article("n1", "hello");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // get_by_id
            .append_query_results([[article]])
            // tags_for: assignments join (empty)
            .append_query_results([Vec::<campus_db::entities::tag_assignment::Model>::new()])
            .into_connection();
        let service = service_over(db);

        let response = service.get_admin("n1").await.unwrap();
        assert_eq!(response.id, "n1");
        assert_eq!(response.title, "hello");
        assert!(response.tags.is_empty());
        assert!(response.image.is_none());
    }
}
