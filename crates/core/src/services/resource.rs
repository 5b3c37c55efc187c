//! Resource service for documents and videos.
//!
//! A resource is the logical record; the physical file lives in a separate
//! row. Creation writes both in one transaction. On update an uploaded file
//! repoints the existing file row instead of replacing the resource.

use std::sync::Arc;

use campus_common::{AppError, AppResult, IdGenerator, StorageService, StoredFile};
use campus_db::entities::{ResourceKind, Visibility, resource, resource_file};
use campus_db::in_transaction;
use campus_db::repositories::ResourceRepository;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set};
use serde::Serialize;

/// Input for creating a resource. The uploaded file is mandatory.
#[derive(Debug)]
pub struct CreateResourceInput {
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub pages: Option<i32>,
    pub author: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub status: Option<Visibility>,
    pub is_downloadable: bool,
    pub file: StoredFile,
}

/// Input for updating a resource. `None` leaves a field untouched.
#[derive(Debug, Default)]
pub struct UpdateResourceInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub pages: Option<i32>,
    pub author: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub status: Option<Visibility>,
    pub is_downloadable: Option<bool>,
    pub file: Option<StoredFile>,
}

/// A physical file as it appears in API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFileResponse {
    pub id: String,
    pub file_path: String,
    pub file_type: String,
    pub is_downloadable: bool,
}

impl From<resource_file::Model> for ResourceFileResponse {
    fn from(f: resource_file::Model) -> Self {
        Self {
            id: f.id,
            file_path: f.file_path,
            file_type: f.file_type,
            is_downloadable: f.is_downloadable,
        }
    }
}

/// A resource as it appears in API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: ResourceKind,
    pub duration: Option<String>,
    pub pages: Option<i32>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub status: Visibility,
    pub files: Vec<ResourceFileResponse>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl ResourceResponse {
    /// Build a response from a resource row and its file rows.
    #[must_use]
    pub fn from_parts(res: resource::Model, files: Vec<ResourceFileResponse>) -> Self {
        Self {
            id: res.id,
            title: res.title,
            description: res.description,
            kind: res.kind,
            duration: res.duration,
            pages: res.pages,
            author: res.author,
            published_date: res.published_date.map(|d| d.to_rfc3339()),
            status: res.status,
            files,
            created_at: res.created_at.to_rfc3339(),
            updated_at: res.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// Resource service for business logic.
#[derive(Clone)]
pub struct ResourceService {
    db: Arc<DatabaseConnection>,
    resource_repo: ResourceRepository,
    storage: StorageService,
    id_gen: IdGenerator,
}

impl ResourceService {
    /// Create a new resource service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        resource_repo: ResourceRepository,
        storage: StorageService,
    ) -> Self {
        Self {
            db,
            resource_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a resource of the given kind together with its file row.
    pub async fn create(
        &self,
        kind: ResourceKind,
        input: CreateResourceInput,
    ) -> AppResult<ResourceResponse> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }

        let resource_id = self.id_gen.generate();
        let file_id = self.id_gen.generate();
        let resource_repo = self.resource_repo.clone();

        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let now = Utc::now();

                let model = resource::ActiveModel {
                    id: Set(resource_id.clone()),
                    title: Set(title),
                    description: Set(input.description),
                    kind: Set(kind),
                    duration: Set(input.duration),
                    pages: Set(input.pages),
                    author: Set(input.author),
                    published_date: Set(Some(
                        input.published_date.unwrap_or(now).into(),
                    )),
                    status: Set(input.status.unwrap_or(Visibility::Show)),
                    created_at: Set(now.into()),
                    updated_at: Set(None),
                    deleted_at: Set(None),
                };
                let res = resource_repo.create(txn, model).await?;

                let file = resource_file::ActiveModel {
                    id: Set(file_id),
                    resource_id: Set(resource_id),
                    file_type: Set(input.file.extension.clone()),
                    file_path: Set(input.file.path.clone()),
                    is_downloadable: Set(input.is_downloadable),
                    created_at: Set(now.into()),
                    updated_at: Set(None),
                    deleted_at: Set(None),
                };
                let file = resource_repo.create_file(txn, file).await?;

                Ok(ResourceResponse::from_parts(res, vec![file.into()]))
            })
        })
        .await
    }

    /// Update a resource; an uploaded file repoints the existing file row.
    pub async fn update(&self, id: &str, input: UpdateResourceInput) -> AppResult<ResourceResponse> {
        let id = id.to_string();
        let file_id = self.id_gen.generate();
        let resource_repo = self.resource_repo.clone();

        let (response, old_path) = in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let res = resource_repo
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Resource not found".to_string()))?;

                let mut active: resource::ActiveModel = res.into();
                if let Some(title) = input.title {
                    let title = title.trim().to_string();
                    if title.is_empty() {
                        return Err(AppError::Validation("Title is required".to_string()));
                    }
                    active.title = Set(title);
                }
                if let Some(description) = input.description {
                    active.description = Set(Some(description));
                }
                if let Some(duration) = input.duration {
                    active.duration = Set(Some(duration));
                }
                if let Some(pages) = input.pages {
                    active.pages = Set(Some(pages));
                }
                if let Some(author) = input.author {
                    active.author = Set(Some(author));
                }
                if let Some(published_date) = input.published_date {
                    active.published_date = Set(Some(published_date.into()));
                }
                if let Some(status) = input.status {
                    active.status = Set(status);
                }
                active.updated_at = Set(Some(Utc::now().into()));
                let res = resource_repo.update(txn, active).await?;

                let mut file_row = resource_repo.find_file_for_in(txn, &res.id).await?;

                // A bare downloadable toggle applies without a new upload.
                if let (Some(is_downloadable), Some(existing)) =
                    (input.is_downloadable, file_row.clone())
                {
                    let mut active: resource_file::ActiveModel = existing.into();
                    active.is_downloadable = Set(is_downloadable);
                    active.updated_at = Set(Some(Utc::now().into()));
                    file_row = Some(resource_repo.update_file(txn, active).await?);
                }

                let mut old_path = None;
                if let Some(stored) = &input.file {
                    if let Some(existing) = file_row.clone() {
                        old_path = Some(existing.file_path.clone());
                        let mut active: resource_file::ActiveModel = existing.into();
                        active.file_type = Set(stored.extension.clone());
                        active.file_path = Set(stored.path.clone());
                        active.updated_at = Set(Some(Utc::now().into()));
                        file_row = Some(resource_repo.update_file(txn, active).await?);
                    } else {
                        let model = resource_file::ActiveModel {
                            id: Set(file_id),
                            resource_id: Set(res.id.clone()),
                            file_type: Set(stored.extension.clone()),
                            file_path: Set(stored.path.clone()),
                            is_downloadable: Set(input.is_downloadable.unwrap_or(false)),
                            created_at: Set(Utc::now().into()),
                            updated_at: Set(None),
                            deleted_at: Set(None),
                        };
                        file_row = Some(resource_repo.create_file(txn, model).await?);
                    }
                }

                let files = file_row.map(Into::into).into_iter().collect();
                Ok((ResourceResponse::from_parts(res, files), old_path))
            })
        })
        .await?;

        if let Some(path) = old_path {
            self.storage.delete_best_effort(&path).await;
        }

        Ok(response)
    }

    /// Delete a resource, its file rows, and the physical file.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = id.to_string();
        let resource_repo = self.resource_repo.clone();

        let stale_files = in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let res = resource_repo
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Resource not found".to_string()))?;

                let mut paths = Vec::new();
                if let Some(file) = resource_repo.find_file_for_in(txn, &res.id).await? {
                    paths.push(file.file_path.clone());
                }

                resource_repo.delete_files_for(txn, &res.id).await?;
                resource_repo.delete(txn, &res.id).await?;

                Ok(paths)
            })
        })
        .await?;

        for path in stale_files {
            self.storage.delete_best_effort(&path).await;
        }

        Ok(())
    }

    /// List resources of a kind.
    pub async fn list(
        &self,
        kind: ResourceKind,
        search: &str,
        public_only: bool,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<ResourceResponse>, u64)> {
        let total = self.resource_repo.count(kind, search, public_only).await?;
        let resources = self
            .resource_repo
            .find_page(kind, search, public_only, offset, limit)
            .await?;

        let mut responses = Vec::with_capacity(resources.len());
        for res in resources {
            let files = self.resource_repo.files_for(&res.id).await?;
            responses.push(ResourceResponse::from_parts(
                res,
                files.into_iter().map(Into::into).collect(),
            ));
        }

        Ok((responses, total))
    }

    /// Fetch a resource of a specific kind with its files.
    pub async fn get(&self, id: &str, kind: ResourceKind) -> AppResult<ResourceResponse> {
        let res = self
            .resource_repo
            .find_by_id_and_kind(id, kind)
            .await?
            .ok_or_else(|| AppError::NotFound("Resource not found".to_string()))?;

        let files = self.resource_repo.files_for(&res.id).await?;
        Ok(ResourceResponse::from_parts(
            res,
            files.into_iter().map(Into::into).collect(),
        ))
    }

    /// Resolve the downloadable file behind a resource.
    ///
    /// Returns the on-disk path and the stored file name.
    pub async fn resolve_download(&self, id: &str) -> AppResult<(std::path::PathBuf, String)> {
        let res = self.resource_repo.get_by_id(id).await?;

        let file = self
            .resource_repo
            .find_downloadable_file(&res.id)
            .await?
            .ok_or_else(|| AppError::NotFound("No downloadable file".to_string()))?;

        let path = self.storage.resolve(&file.file_path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download.bin".to_string());

        Ok((path, name))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campus_common::config::StorageConfig;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn stored(name: &str, ext: &str) -> StoredFile {
        StoredFile {
            path: format!("video/{name}.{ext}"),
            file_name: format!("{name}.{ext}"),
            extension: ext.to_string(),
        }
    }

    fn service_over(db: sea_orm::DatabaseConnection) -> ResourceService {
        let db = Arc::new(db);
        ResourceService::new(
            Arc::clone(&db),
            ResourceRepository::new(Arc::clone(&db)),
            StorageService::new(&StorageConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_over(db);

        let result = service
            .create(
                ResourceKind::Video,
                CreateResourceInput {
                    title: String::new(),
                    description: None,
                    duration: None,
                    pages: None,
                    author: None,
                    published_date: None,
                    status: None,
                    is_downloadable: true,
                    file: stored("clip", "mp4"),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_wrong_kind_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<resource::Model>::new()])
            .into_connection();
        let service = service_over(db);

        let result = service.get("doc1", ResourceKind::Video).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
