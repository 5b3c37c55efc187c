//! Image gallery service.
//!
//! Standalone uploads that are not bound to a news/event/course slot. Rows
//! carry `ref_type = "gallery"` and no owner id.

use std::sync::Arc;

use campus_common::{AppError, AppResult, IdGenerator, StorageService, StoredFile};
use campus_db::entities::image;
use campus_db::repositories::ImageRepository;
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};
use serde::Serialize;

/// Owner discriminator for standalone gallery uploads.
const REF_TYPE: &str = "gallery";

/// An image as it appears in API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: String,
    pub ref_id: Option<String>,
    pub ref_type: Option<String>,
    pub image_path: String,
    pub created_at: String,
}

impl From<image::Model> for ImageResponse {
    fn from(i: image::Model) -> Self {
        Self {
            id: i.id,
            ref_id: i.ref_id,
            ref_type: i.ref_type,
            image_path: i.image_path,
            created_at: i.created_at.to_rfc3339(),
        }
    }
}

/// Image gallery service.
#[derive(Clone)]
pub struct ImageService {
    db: Arc<DatabaseConnection>,
    image_repo: ImageRepository,
    storage: StorageService,
    id_gen: IdGenerator,
}

impl ImageService {
    /// Create a new image service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        image_repo: ImageRepository,
        storage: StorageService,
    ) -> Self {
        Self {
            db,
            image_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a stored upload as a gallery image.
    pub async fn upload(&self, stored: StoredFile) -> AppResult<ImageResponse> {
        let model = image::ActiveModel {
            id: Set(self.id_gen.generate()),
            ref_id: Set(None),
            ref_type: Set(Some(REF_TYPE.to_string())),
            image_path: Set(stored.path),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            deleted_at: Set(None),
        };

        let image = self.image_repo.create(self.db.as_ref(), model).await?;
        Ok(image.into())
    }

    /// List images, newest first.
    pub async fn list(
        &self,
        search: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<ImageResponse>, u64)> {
        let total = self.image_repo.count(search).await?;
        let images = self.image_repo.find_page(search, offset, limit).await?;
        Ok((images.into_iter().map(Into::into).collect(), total))
    }

    /// Delete an image row and its file on disk.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let image = self
            .image_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        self.image_repo.delete(self.db.as_ref(), &image.id).await?;
        self.storage.delete_best_effort(&image.image_path).await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campus_common::config::StorageConfig;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn service_over(db: sea_orm::DatabaseConnection) -> ImageService {
        let db = Arc::new(db);
        ImageService::new(
            Arc::clone(&db),
            ImageRepository::new(Arc::clone(&db)),
            StorageService::new(&StorageConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_delete_missing_image_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<image::Model>::new()])
            .into_connection();
        let service = service_over(db);

        let result = service.delete("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_maps_models() {
        let image = image::Model {
            id: "i1".to_string(),
            ref_id: None,
            ref_type: Some("gallery".to_string()),
            image_path: "upload/image-1-2.png".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
            deleted_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(1)) },
            ]])
            .append_query_results([vec![image]])
            .into_connection();
        let service = service_over(db);

        let (images, total) = service.list("", 0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].image_path, "upload/image-1-2.png");
    }
}
