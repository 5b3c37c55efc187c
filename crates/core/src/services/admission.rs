//! Admission round service.

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::entities::admission;
use campus_db::repositories::AdmissionRepository;
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for creating or replacing an admission round.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionInput {
    #[validate(length(min = 1, max = 512))]
    pub title: String,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    #[serde(default)]
    pub selection_start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub selection_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub training_start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    #[validate(url)]
    pub link_register: Option<String>,
}

/// An admission round as it appears in API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    pub id: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub selection_start_date: Option<String>,
    pub selection_end_date: Option<String>,
    pub training_start_date: Option<String>,
    pub link_register: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<admission::Model> for AdmissionResponse {
    fn from(a: admission::Model) -> Self {
        Self {
            id: a.id,
            title: a.title,
            start_date: a.start_date.to_rfc3339(),
            end_date: a.end_date.to_rfc3339(),
            selection_start_date: a.selection_start_date.map(|d| d.to_rfc3339()),
            selection_end_date: a.selection_end_date.map(|d| d.to_rfc3339()),
            training_start_date: a.training_start_date.map(|d| d.to_rfc3339()),
            link_register: a.link_register,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// Admission service for business logic.
#[derive(Clone)]
pub struct AdmissionService {
    admission_repo: AdmissionRepository,
    id_gen: IdGenerator,
}

impl AdmissionService {
    /// Create a new admission service.
    #[must_use]
    pub const fn new(admission_repo: AdmissionRepository) -> Self {
        Self {
            admission_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an admission round.
    pub async fn create(&self, input: AdmissionInput) -> AppResult<AdmissionResponse> {
        input.validate()?;
        if input.end_date < input.start_date {
            return Err(AppError::Validation(
                "End date must not precede start date".to_string(),
            ));
        }

        let model = admission::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            start_date: Set(input.start_date.into()),
            end_date: Set(input.end_date.into()),
            selection_start_date: Set(input.selection_start_date.map(Into::into)),
            selection_end_date: Set(input.selection_end_date.map(Into::into)),
            training_start_date: Set(input.training_start_date.map(Into::into)),
            link_register: Set(input.link_register),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            deleted_at: Set(None),
        };

        let admission = self.admission_repo.create(model).await?;
        Ok(admission.into())
    }

    /// Replace an admission round's fields.
    pub async fn update(&self, id: &str, input: AdmissionInput) -> AppResult<AdmissionResponse> {
        input.validate()?;
        if input.end_date < input.start_date {
            return Err(AppError::Validation(
                "End date must not precede start date".to_string(),
            ));
        }

        let existing = self.admission_repo.get_by_id(id).await?;

        let mut active: admission::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.start_date = Set(input.start_date.into());
        active.end_date = Set(input.end_date.into());
        active.selection_start_date = Set(input.selection_start_date.map(Into::into));
        active.selection_end_date = Set(input.selection_end_date.map(Into::into));
        active.training_start_date = Set(input.training_start_date.map(Into::into));
        active.link_register = Set(input.link_register);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.admission_repo.update(active).await?;
        Ok(updated.into())
    }

    /// Delete an admission round.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let existing = self.admission_repo.get_by_id(id).await?;
        self.admission_repo.delete(&existing.id).await
    }

    /// All rounds, earliest start first.
    pub async fn list(&self) -> AppResult<Vec<AdmissionResponse>> {
        let rounds = self.admission_repo.find_all().await?;
        Ok(rounds.into_iter().map(Into::into).collect())
    }

    /// Rounds whose registration window covers now.
    pub async fn list_active(&self) -> AppResult<Vec<AdmissionResponse>> {
        let rounds = self.admission_repo.find_active(Utc::now()).await?;
        Ok(rounds.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn service_over(db: sea_orm::DatabaseConnection) -> AdmissionService {
        AdmissionService::new(AdmissionRepository::new(Arc::new(db)))
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_window() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_over(db);

        let now = Utc::now();
        let result = service
            .create(AdmissionInput {
                title: "Spring intake".to_string(),
                start_date: now,
                end_date: now - Duration::days(1),
                selection_start_date: None,
                selection_end_date: None,
                training_start_date: None,
                link_register: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_maps_models() {
        let round = admission::Model {
            id: "adm1".to_string(),
            title: "Spring intake".to_string(),
            start_date: Utc::now().into(),
            end_date: Utc::now().into(),
            selection_start_date: None,
            selection_end_date: None,
            training_start_date: None,
            link_register: None,
            created_at: Utc::now().into(),
            updated_at: None,
            deleted_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![round]])
            .into_connection();
        let service = service_over(db);

        let rounds = service.list().await.unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].title, "Spring intake");
    }
}
