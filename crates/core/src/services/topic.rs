//! Topic service (Q&A threads and their answers).
//!
//! Create and update accept an inline answer list that REPLACES every
//! existing answer for the topic; the replacement runs inside the same
//! transaction as the topic row.

use std::sync::Arc;

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::entities::{Visibility, topic, topic_answer};
use campus_db::in_transaction;
use campus_db::repositories::TopicRepository;
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Inline answer payload used when creating/updating a topic.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub answer_text: String,
    pub answered_by: String,
    #[serde(default)]
    pub status: Option<Visibility>,
}

/// Input for creating a topic.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicInput {
    #[validate(length(min = 1, max = 1024))]
    pub title: String,

    #[validate(length(min = 1, max = 256))]
    pub posted_by: String,

    #[serde(default)]
    pub is_approved: Option<bool>,

    #[serde(default)]
    pub status: Option<Visibility>,

    #[serde(default)]
    pub answers: Vec<AnswerInput>,
}

/// Input for updating a topic. `None` leaves a field untouched; a present
/// answer list replaces every stored answer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTopicInput {
    pub title: Option<String>,
    pub posted_by: Option<String>,
    pub is_approved: Option<bool>,
    pub status: Option<Visibility>,
    pub answers: Option<Vec<AnswerInput>>,
}

/// Input for creating a standalone answer.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswerInput {
    pub topic_id: String,

    #[validate(length(min = 1))]
    pub answer_text: String,

    #[validate(length(min = 1, max = 256))]
    pub answered_by: String,

    #[serde(default)]
    pub status: Option<Visibility>,
}

/// Input for updating a standalone answer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnswerInput {
    pub answer_text: Option<String>,
    pub answered_by: Option<String>,
    pub status: Option<Visibility>,
}

/// An answer as it appears in API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub id: String,
    pub topic_id: String,
    pub answer_text: String,
    pub answered_by: String,
    pub status: Visibility,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<topic_answer::Model> for AnswerResponse {
    fn from(a: topic_answer::Model) -> Self {
        Self {
            id: a.id,
            topic_id: a.topic_id,
            answer_text: a.answer_text,
            answered_by: a.answered_by,
            status: a.status,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// A topic as it appears in API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    pub id: String,
    pub title: String,
    pub posted_by: String,
    pub is_approved: bool,
    pub status: Visibility,
    pub answers: Vec<AnswerResponse>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

fn build_response(topic: topic::Model, answers: Vec<topic_answer::Model>) -> TopicResponse {
    TopicResponse {
        id: topic.id,
        title: topic.title,
        posted_by: topic.posted_by,
        is_approved: topic.is_approved,
        status: topic.status,
        answers: answers.into_iter().map(Into::into).collect(),
        created_at: topic.created_at.to_rfc3339(),
        updated_at: topic.updated_at.map(|d| d.to_rfc3339()),
    }
}

/// Topic service for business logic.
#[derive(Clone)]
pub struct TopicService {
    db: Arc<DatabaseConnection>,
    topic_repo: TopicRepository,
    id_gen: IdGenerator,
}

impl TopicService {
    /// Create a new topic service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, topic_repo: TopicRepository) -> Self {
        Self {
            db,
            topic_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a topic, optionally with inline answers.
    pub async fn create(&self, input: CreateTopicInput) -> AppResult<TopicResponse> {
        input.validate()?;

        let topic_id = self.id_gen.generate();
        let topic_repo = self.topic_repo.clone();
        let id_gen = self.id_gen.clone();

        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let now = Utc::now();

                let model = topic::ActiveModel {
                    id: Set(topic_id.clone()),
                    title: Set(input.title),
                    posted_by: Set(input.posted_by),
                    is_approved: Set(input.is_approved.unwrap_or(false)),
                    status: Set(input.status.unwrap_or_default()),
                    created_at: Set(now.into()),
                    updated_at: Set(None),
                    deleted_at: Set(None),
                };
                let topic = topic_repo.create(txn, model).await?;

                let answers = if input.answers.is_empty() {
                    vec![]
                } else {
                    replace_answers(txn, &topic_repo, &id_gen, &topic_id, &input.answers).await?
                };

                Ok(build_response(topic, answers))
            })
        })
        .await
    }

    /// Update a topic; a present answer list replaces all stored answers.
    pub async fn update(&self, id: &str, input: UpdateTopicInput) -> AppResult<TopicResponse> {
        let id = id.to_string();
        let topic_repo = self.topic_repo.clone();
        let id_gen = self.id_gen.clone();

        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let topic = topic_repo
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Topic not found".to_string()))?;

                let mut active: topic::ActiveModel = topic.into();
                if let Some(title) = input.title {
                    active.title = Set(title);
                }
                if let Some(posted_by) = input.posted_by {
                    active.posted_by = Set(posted_by);
                }
                if let Some(is_approved) = input.is_approved {
                    active.is_approved = Set(is_approved);
                }
                if let Some(status) = input.status {
                    active.status = Set(status);
                }
                active.updated_at = Set(Some(Utc::now().into()));
                let topic = topic_repo.update(txn, active).await?;

                let answers = if let Some(wanted) = &input.answers {
                    replace_answers(txn, &topic_repo, &id_gen, &id, wanted).await?
                } else {
                    topic_repo.answers_for_in(txn, &id).await?
                };

                Ok(build_response(topic, answers))
            })
        })
        .await
    }

    /// Delete a topic and its answers.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = id.to_string();
        let topic_repo = self.topic_repo.clone();

        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let topic = topic_repo
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Topic not found".to_string()))?;

                topic_repo.delete_answers_for(txn, &topic.id).await?;
                topic_repo.delete(txn, &topic.id).await?;
                Ok(())
            })
        })
        .await
    }

    /// List topics with their answers.
    pub async fn list(
        &self,
        search: &str,
        public_only: bool,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<TopicResponse>, u64)> {
        let total = self.topic_repo.count(search, public_only).await?;
        let topics = self
            .topic_repo
            .find_page(search, public_only, offset, limit)
            .await?;

        let mut responses = Vec::with_capacity(topics.len());
        for topic in topics {
            let answers = self.topic_repo.answers_for(&topic.id).await?;
            responses.push(build_response(topic, answers));
        }

        Ok((responses, total))
    }

    /// Fetch a topic regardless of visibility.
    pub async fn get_admin(&self, id: &str) -> AppResult<TopicResponse> {
        let topic = self.topic_repo.get_by_id(id).await?;
        let answers = self.topic_repo.answers_for(&topic.id).await?;
        Ok(build_response(topic, answers))
    }

    /// Fetch a publicly visible topic.
    pub async fn get_public(&self, id: &str) -> AppResult<TopicResponse> {
        let topic = self
            .topic_repo
            .find_visible_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Topic not found".to_string()))?;
        let answers = self.topic_repo.answers_for(&topic.id).await?;
        Ok(build_response(topic, answers))
    }

    // === Standalone answers ===

    /// Create an answer under an existing topic.
    ///
    /// `force_hidden` pins the status to hidden regardless of input; the
    /// public surface uses it so visitor answers await moderation.
    pub async fn create_answer(
        &self,
        input: CreateAnswerInput,
        force_hidden: bool,
    ) -> AppResult<AnswerResponse> {
        input.validate()?;

        self.topic_repo
            .find_by_id(&input.topic_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Topic not found".to_string()))?;

        let status = if force_hidden {
            Visibility::Hide
        } else {
            input.status.unwrap_or_default()
        };

        let model = topic_answer::ActiveModel {
            id: Set(self.id_gen.generate()),
            topic_id: Set(input.topic_id),
            answer_text: Set(input.answer_text),
            answered_by: Set(input.answered_by),
            status: Set(status),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            deleted_at: Set(None),
        };

        let answer = self
            .topic_repo
            .create_answer(self.db.as_ref(), model)
            .await?;
        Ok(answer.into())
    }

    /// Answers under a topic.
    pub async fn answers_for_topic(&self, topic_id: &str) -> AppResult<Vec<AnswerResponse>> {
        self.topic_repo
            .find_by_id(topic_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Topic not found".to_string()))?;

        let answers = self.topic_repo.answers_for(topic_id).await?;
        Ok(answers.into_iter().map(Into::into).collect())
    }

    /// Fetch a single answer.
    pub async fn get_answer(&self, id: &str) -> AppResult<AnswerResponse> {
        Ok(self.topic_repo.get_answer_by_id(id).await?.into())
    }

    /// Update an answer.
    pub async fn update_answer(
        &self,
        id: &str,
        input: UpdateAnswerInput,
    ) -> AppResult<AnswerResponse> {
        let answer = self.topic_repo.get_answer_by_id(id).await?;

        let mut active: topic_answer::ActiveModel = answer.into();
        if let Some(answer_text) = input.answer_text {
            active.answer_text = Set(answer_text);
        }
        if let Some(answered_by) = input.answered_by {
            active.answered_by = Set(answered_by);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self
            .topic_repo
            .update_answer(self.db.as_ref(), active)
            .await?;
        Ok(updated.into())
    }

    /// Delete an answer.
    pub async fn delete_answer(&self, id: &str) -> AppResult<()> {
        let answer = self.topic_repo.get_answer_by_id(id).await?;
        self.topic_repo
            .delete_answer(self.db.as_ref(), &answer.id)
            .await
    }
}

/// Drop every stored answer for the topic and insert the provided list.
async fn replace_answers<C: ConnectionTrait>(
    db: &C,
    topic_repo: &TopicRepository,
    id_gen: &IdGenerator,
    topic_id: &str,
    answers: &[AnswerInput],
) -> AppResult<Vec<topic_answer::Model>> {
    topic_repo.delete_answers_for(db, topic_id).await?;

    let now = Utc::now();
    let mut created = Vec::with_capacity(answers.len());
    for answer in answers {
        let model = topic_answer::ActiveModel {
            id: Set(id_gen.generate()),
            topic_id: Set(topic_id.to_string()),
            answer_text: Set(answer.answer_text.clone()),
            answered_by: Set(answer.answered_by.clone()),
            status: Set(answer.status.unwrap_or_default()),
            created_at: Set(now.into()),
            updated_at: Set(None),
            deleted_at: Set(None),
        };
        created.push(topic_repo.create_answer(db, model).await?);
    }

    Ok(created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn make_topic(id: &str) -> topic::Model {
        topic::Model {
            id: id.to_string(),
            title: "How do I enroll?".to_string(),
            posted_by: "visitor".to_string(),
            is_approved: true,
            status: Visibility::Show,
            created_at: Utc::now().into(),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn service_over(db: sea_orm::DatabaseConnection) -> TopicService {
        let db = Arc::new(db);
        TopicService::new(Arc::clone(&db), TopicRepository::new(Arc::clone(&db)))
    }

    #[tokio::test]
    async fn test_create_validates_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_over(db);

        let result = service
            .create(CreateTopicInput {
                title: String::new(),
                posted_by: "someone".to_string(),
                is_approved: None,
                status: None,
                answers: vec![],
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_answer_requires_topic() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<topic::Model>::new()])
            .into_connection();
        let service = service_over(db);

        let result = service
            .create_answer(
                CreateAnswerInput {
                    topic_id: "missing".to_string(),
                    answer_text: "hello".to_string(),
                    answered_by: "staff".to_string(),
                    status: None,
                },
                false,
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_public_answer_is_forced_hidden() {
        let answer = topic_answer::Model {
            id: "a1".to_string(),
            topic_id: "t1".to_string(),
            answer_text: "hello".to_string(),
            answered_by: "visitor".to_string(),
            status: Visibility::Hide,
            created_at: Utc::now().into(),
            updated_at: None,
            deleted_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![make_topic("t1")]])
            .append_query_results([vec![answer]])
            .into_connection();
        let service = service_over(db);

        let response = service
            .create_answer(
                CreateAnswerInput {
                    topic_id: "t1".to_string(),
                    answer_text: "hello".to_string(),
                    answered_by: "visitor".to_string(),
                    status: Some(Visibility::Show),
                },
                true,
            )
            .await
            .unwrap();

        assert_eq!(response.status, Visibility::Hide);
    }
}
