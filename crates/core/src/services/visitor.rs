//! Visitor tracking service.

use campus_common::{AppResult, IdGenerator};
use campus_db::entities::visitor;
use campus_db::repositories::VisitorRepository;
use chrono::Utc;
use sea_orm::Set;
use serde::Serialize;

/// A recorded visit as it appears in API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorResponse {
    pub id: String,
    pub ip: String,
    pub created_at: String,
}

impl From<visitor::Model> for VisitorResponse {
    fn from(v: visitor::Model) -> Self {
        Self {
            id: v.id,
            ip: v.ip,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

/// Visitor service for business logic.
#[derive(Clone)]
pub struct VisitorService {
    visitor_repo: VisitorRepository,
    id_gen: IdGenerator,
}

impl VisitorService {
    /// Create a new visitor service.
    #[must_use]
    pub const fn new(visitor_repo: VisitorRepository) -> Self {
        Self {
            visitor_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record a visit from the given client address.
    pub async fn record(&self, ip: &str) -> AppResult<VisitorResponse> {
        let now = Utc::now();
        let model = visitor::ActiveModel {
            id: Set(self.id_gen.generate()),
            ip: Set(ip.to_string()),
            last_seen_at: Set(Some(now.into())),
            created_at: Set(now.into()),
        };

        let visit = self.visitor_repo.create(model).await?;
        Ok(visit.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_record_returns_visit() {
        let visit = visitor::Model {
            id: "v1".to_string(),
            ip: "203.0.113.7".to_string(),
            last_seen_at: None,
            created_at: Utc::now().into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![visit]])
            .into_connection();
        let service = VisitorService::new(VisitorRepository::new(Arc::new(db)));

        let response = service.record("203.0.113.7").await.unwrap();
        assert_eq!(response.ip, "203.0.113.7");
    }
}
