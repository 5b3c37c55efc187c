//! Event service.
//!
//! Same transactional shape as news: the event row, its image slot, and its
//! tag assignments commit or roll back together.

use std::sync::Arc;

use campus_common::{AppError, AppResult, IdGenerator, StorageService, StoredFile};
use campus_db::entities::{Visibility, event, image};
use campus_db::in_transaction;
use campus_db::repositories::{EventRepository, ImageRepository};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set};
use serde::Serialize;

use crate::services::news::NewsImageResponse;
use crate::services::tagging::{TagResponse, TaggingService};

/// Taggable discriminator for event rows.
const TAGGABLE_TYPE: &str = "event";

/// Input for creating an event.
#[derive(Debug, Default)]
pub struct CreateEventInput {
    pub title: String,
    pub description: String,
    pub event_date: Option<DateTime<Utc>>,
    pub status: Option<Visibility>,
    pub tags: Option<Vec<String>>,
    pub image: Option<StoredFile>,
}

/// Input for updating an event. `None` leaves a field untouched.
#[derive(Debug, Default)]
pub struct UpdateEventInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub status: Option<Visibility>,
    pub tags: Option<Vec<String>>,
    pub image: Option<StoredFile>,
}

/// An event as it appears in API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_date: Option<String>,
    pub status: Visibility,
    pub image: Option<NewsImageResponse>,
    pub tags: Vec<TagResponse>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Event service for business logic.
#[derive(Clone)]
pub struct EventService {
    db: Arc<DatabaseConnection>,
    event_repo: EventRepository,
    image_repo: ImageRepository,
    tagging: TaggingService,
    storage: StorageService,
    id_gen: IdGenerator,
}

impl EventService {
    /// Create a new event service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        event_repo: EventRepository,
        image_repo: ImageRepository,
        tagging: TaggingService,
        storage: StorageService,
    ) -> Self {
        Self {
            db,
            event_repo,
            image_repo,
            tagging,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an event together with its image and tag assignments.
    pub async fn create(&self, input: CreateEventInput) -> AppResult<EventResponse> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if input.description.is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }

        let event_id = self.id_gen.generate();
        let image_id = input.image.as_ref().map(|_| self.id_gen.generate());

        let event_repo = self.event_repo.clone();
        let image_repo = self.image_repo.clone();
        let tagging = self.tagging.clone();

        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let now = Utc::now();

                let image = if let (Some(stored), Some(image_id)) = (&input.image, &image_id) {
                    let model = image::ActiveModel {
                        id: Set(image_id.clone()),
                        ref_id: Set(Some(event_id.clone())),
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

                let model = event::ActiveModel {
                    id: Set(event_id.clone()),
                    title: Set(title),
                    description: Set(input.description),
                    event_date: Set(input.event_date.map(Into::into)),
                    status: Set(input.status.unwrap_or_default()),
                    img_id: Set(image_id),
                    created_at: Set(now.into()),
                    updated_at: Set(None),
                    deleted_at: Set(None),
                };
                let event = event_repo.create(txn, model).await?;

                if let Some(tags) = &input.tags {
                    tagging.reconcile(txn, TAGGABLE_TYPE, &event_id, tags).await?;
                }

                let tags = tagging.tags_for(txn, TAGGABLE_TYPE, &event_id).await?;
                Ok(build_response(event, image, tags))
            })
        })
        .await
    }

    /// Update an event; a new image replaces the old slot entirely.
    pub async fn update(&self, id: &str, input: UpdateEventInput) -> AppResult<EventResponse> {
        let new_image_id = input.image.as_ref().map(|_| self.id_gen.generate());
        let id = id.to_string();

        let event_repo = self.event_repo.clone();
        let image_repo = self.image_repo.clone();
        let tagging = self.tagging.clone();

        let (response, old_image_path) = in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let event = event_repo
                    .find_by_id_in(txn, &id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

                let old_img_id = event.img_id.clone();
                let mut active: event::ActiveModel = event.into();

                if let Some(title) = input.title {
                    let title = title.trim().to_string();
                    if title.is_empty() {
                        return Err(AppError::Validation("Title is required".to_string()));
                    }
                    active.title = Set(title);
                }
                if let Some(description) = input.description {
                    active.description = Set(description);
                }
                if let Some(event_date) = input.event_date {
                    active.event_date = Set(Some(event_date.into()));
                }
                if let Some(status) = input.status {
                    active.status = Set(status);
                }

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
                let event = event_repo.update(txn, active).await?;

                if let Some(tags) = &input.tags {
                    tagging.reconcile(txn, TAGGABLE_TYPE, &id, tags).await?;
                }

                if image.is_none()
                    && let Some(img_id) = &event.img_id
                {
                    image = image_repo.find_by_id_in(txn, img_id).await?;
                }

                let tags = tagging.tags_for(txn, TAGGABLE_TYPE, &id).await?;
                Ok((build_response(event, image, tags), old_image_path))
            })
        })
        .await?;

        if let Some(path) = old_image_path {
            self.storage.delete_best_effort(&path).await;
        }

        Ok(response)
    }

    /// Delete an event together with its image rows and tag assignments.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = id.to_string();
        let event_repo = self.event_repo.clone();
        let image_repo = self.image_repo.clone();
        let tagging = self.tagging.clone();

        let image_paths = in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let event = event_repo
                    .find_by_id_in(txn, &id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

                let mut paths = Vec::new();
                if let Some(img_id) = &event.img_id
                    && let Some(img) = image_repo.find_by_id_in(txn, img_id).await?
                {
                    paths.push(img.image_path.clone());
                    image_repo.delete(txn, &img.id).await?;
                }

                image_repo.delete_for_owner(txn, TAGGABLE_TYPE, &id).await?;
                tagging.clear(txn, TAGGABLE_TYPE, &id).await?;
                event_repo.delete(txn, &id).await?;

                Ok(paths)
            })
        })
        .await?;

        for path in image_paths {
            self.storage.delete_best_effort(&path).await;
        }

        Ok(())
    }

    /// List events.
    pub async fn list(
        &self,
        search: &str,
        public_only: bool,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<EventResponse>, u64)> {
        let total = self.event_repo.count(search, public_only).await?;
        let events = self
            .event_repo
            .find_page(search, public_only, offset, limit)
            .await?;
        let responses = self.assemble(events).await?;
        Ok((responses, total))
    }

    /// Fetch a single event.
    pub async fn get(&self, id: &str) -> AppResult<EventResponse> {
        let event = self.event_repo.get_by_id(id).await?;
        let mut responses = self.assemble(vec![event]).await?;
        responses
            .pop()
            .ok_or_else(|| AppError::Internal("Empty assembly".to_string()))
    }

    async fn assemble(&self, events: Vec<event::Model>) -> AppResult<Vec<EventResponse>> {
        let conn = self.db.as_ref();
        let mut responses = Vec::with_capacity(events.len());
        for event in events {
            let image = match &event.img_id {
                Some(img_id) => self.image_repo.find_by_id(img_id).await?,
                None => None,
            };
            let tags = self.tagging.tags_for(conn, TAGGABLE_TYPE, &event.id).await?;
            responses.push(build_response(event, image, tags));
        }
        Ok(responses)
    }
}

fn build_response(
    event: event::Model,
    image: Option<image::Model>,
    tags: Vec<TagResponse>,
) -> EventResponse {
    EventResponse {
        id: event.id,
        title: event.title,
        description: event.description,
        event_date: event.event_date.map(|d| d.to_rfc3339()),
        status: event.status,
        image: image.map(|i| NewsImageResponse {
            id: i.id,
            image_path: i.image_path,
        }),
        tags,
        created_at: event.created_at.to_rfc3339(),
        updated_at: event.updated_at.map(|d| d.to_rfc3339()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campus_common::config::StorageConfig;
    use campus_db::repositories::TagRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn service_over(db: sea_orm::DatabaseConnection) -> EventService {
        let db = Arc::new(db);
        EventService::new(
            Arc::clone(&db),
            EventRepository::new(Arc::clone(&db)),
            ImageRepository::new(Arc::clone(&db)),
            TaggingService::new(TagRepository::new(Arc::clone(&db))),
            StorageService::new(&StorageConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_create_requires_description() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_over(db);

        let result = service
            .create(CreateEventInput {
                title: "Open day".to_string(),
                description: String::new(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_missing_event_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<event::Model>::new()])
            .into_connection();
        let service = service_over(db);

        let result = service.get("nope").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
