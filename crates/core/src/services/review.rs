//! Review service.

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::entities::review;
use campus_db::repositories::{CourseRepository, ReviewRepository};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for creating a review.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewInput {
    pub course_id: String,

    #[validate(length(min = 1, max = 256))]
    pub username: String,

    #[validate(range(min = 0.0, max = 5.0))]
    pub score: Option<f32>,

    #[validate(length(max = 4096))]
    pub comment: Option<String>,
}

/// A review as it appears in API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub course_id: String,
    pub username: String,
    pub score: Option<f32>,
    pub comment: Option<String>,
    pub created_at: String,
}

impl From<review::Model> for ReviewResponse {
    fn from(r: review::Model) -> Self {
        Self {
            id: r.id,
            course_id: r.course_id,
            username: r.username,
            score: r.score,
            comment: r.comment,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Review service for business logic.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    course_repo: CourseRepository,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(review_repo: ReviewRepository, course_repo: CourseRepository) -> Self {
        Self {
            review_repo,
            course_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a review for an existing course.
    pub async fn create(&self, input: CreateReviewInput) -> AppResult<ReviewResponse> {
        input.validate()?;

        self.course_repo
            .find_by_id(&input.course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let model = review::ActiveModel {
            id: Set(self.id_gen.generate()),
            course_id: Set(input.course_id),
            username: Set(input.username),
            score: Set(input.score),
            comment: Set(input.comment),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            deleted_at: Set(None),
        };

        let review = self.review_repo.create(model).await?;
        Ok(review.into())
    }

    /// Reviews for a course.
    pub async fn list_for_course(&self, course_id: &str) -> AppResult<Vec<ReviewResponse>> {
        let reviews = self.review_repo.find_by_course(course_id).await?;
        Ok(reviews.into_iter().map(Into::into).collect())
    }

    /// Delete a review, verifying it belongs to the given course.
    pub async fn delete(&self, course_id: &str, review_id: &str) -> AppResult<()> {
        self.course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let review = self
            .review_repo
            .find_by_id_and_course(review_id, course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

        self.review_repo.delete(review).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use campus_db::entities::course;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn make_course(id: &str) -> course::Model {
        course::Model {
            id: id.to_string(),
            name: "Welding 101".to_string(),
            description: None,
            sub_description: None,
            additional_info: None,
            instructor: None,
            resource_id: None,
            img_id: None,
            created_at: Utc::now().into(),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn service_over(db: sea_orm::DatabaseConnection) -> ReviewService {
        let db = Arc::new(db);
        ReviewService::new(
            ReviewRepository::new(Arc::clone(&db)),
            CourseRepository::new(Arc::clone(&db)),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_score() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_over(db);

        let result = service
            .create(CreateReviewInput {
                course_id: "c1".to_string(),
                username: "student".to_string(),
                score: Some(9.5),
                comment: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_requires_existing_course() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<course::Model>::new()])
            .into_connection();
        let service = service_over(db);

        let result = service
            .create(CreateReviewInput {
                course_id: "missing".to_string(),
                username: "student".to_string(),
                score: Some(4.0),
                comment: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_persists_review() {
        let review = review::Model {
            id: "r1".to_string(),
            course_id: "c1".to_string(),
            username: "student".to_string(),
            score: Some(4.5),
            comment: Some("great".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
            deleted_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![make_course("c1")]])
            .append_query_results([vec![review]])
            .into_connection();
        let service = service_over(db);

        let response = service
            .create(CreateReviewInput {
                course_id: "c1".to_string(),
                username: "student".to_string(),
                score: Some(4.5),
                comment: Some("great".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(response.course_id, "c1");
        assert_eq!(response.score, Some(4.5));
    }
}
