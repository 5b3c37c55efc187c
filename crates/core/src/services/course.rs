//! Course service.
//!
//! A course aggregates an image slot, a video resource (with its physical
//! file), industry labels, and reviews. Create and update fan out across all
//! of those tables inside one transaction; the video and image slots follow
//! replace-don't-merge semantics.

use std::sync::Arc;

use campus_common::{AppError, AppResult, IdGenerator, StorageService, StoredFile};
use campus_db::entities::{
    ResourceKind, Visibility, course, image, industry, resource, resource_file,
};
use campus_db::in_transaction;
use campus_db::repositories::{CourseRepository, ImageRepository, ResourceRepository, ReviewRepository};
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, Set};
use serde::Serialize;

use crate::services::news::NewsImageResponse;
use crate::services::resource::{ResourceFileResponse, ResourceResponse};
use crate::services::review::ReviewResponse;

/// Owner discriminator for course images.
const REF_TYPE: &str = "course";

/// Input for creating a course.
#[derive(Debug, Default)]
pub struct CreateCourseInput {
    pub name: String,
    pub description: Option<String>,
    pub sub_description: Option<String>,
    pub additional_info: Option<String>,
    pub instructor: Option<String>,
    pub is_downloadable: bool,
    pub industries: Vec<String>,
    pub image: Option<StoredFile>,
    pub video: Option<StoredFile>,
}

/// Input for updating a course. `None` leaves a field untouched.
#[derive(Debug, Default)]
pub struct UpdateCourseInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sub_description: Option<String>,
    pub additional_info: Option<String>,
    pub instructor: Option<String>,
    pub is_downloadable: Option<bool>,
    pub industries: Option<Vec<String>>,
    pub image: Option<StoredFile>,
    pub video: Option<StoredFile>,
}

/// An industry label as it appears in API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryResponse {
    pub id: String,
    pub name: String,
}

/// A course as it appears in API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sub_description: Option<String>,
    pub additional_info: Option<String>,
    pub instructor: Option<String>,
    pub image: Option<NewsImageResponse>,
    pub industries: Vec<IndustryResponse>,
    pub resource: Option<ResourceResponse>,
    pub reviews: Vec<ReviewResponse>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Course service for business logic.
#[derive(Clone)]
pub struct CourseService {
    db: Arc<DatabaseConnection>,
    course_repo: CourseRepository,
    resource_repo: ResourceRepository,
    image_repo: ImageRepository,
    review_repo: ReviewRepository,
    storage: StorageService,
    id_gen: IdGenerator,
}

impl CourseService {
    /// Create a new course service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        course_repo: CourseRepository,
        resource_repo: ResourceRepository,
        image_repo: ImageRepository,
        review_repo: ReviewRepository,
        storage: StorageService,
    ) -> Self {
        Self {
            db,
            course_repo,
            resource_repo,
            image_repo,
            review_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a course with its image, video resource, and industry labels.
    pub async fn create(&self, input: CreateCourseInput) -> AppResult<CourseResponse> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let course_id = self.id_gen.generate();
        let image_id = input.image.as_ref().map(|_| self.id_gen.generate());
        let resource_id = input.video.as_ref().map(|_| self.id_gen.generate());
        let id_gen = self.id_gen.clone();

        let course_repo = self.course_repo.clone();
        let resource_repo = self.resource_repo.clone();
        let image_repo = self.image_repo.clone();

        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let now = Utc::now();

                let image = if let (Some(stored), Some(image_id)) = (&input.image, &image_id) {
                    let model = image::ActiveModel {
                        id: Set(image_id.clone()),
                        ref_id: Set(Some(course_id.clone())),
                        ref_type: Set(Some(REF_TYPE.to_string())),
                        image_path: Set(stored.path.clone()),
                        created_at: Set(now.into()),
                        updated_at: Set(None),
                        deleted_at: Set(None),
                    };
                    Some(image_repo.create(txn, model).await?)
                } else {
                    None
                };

                let video = if let (Some(stored), Some(resource_id)) =
                    (&input.video, &resource_id)
                {
                    let model = resource::ActiveModel {
                        id: Set(resource_id.clone()),
                        title: Set(name.clone()),
                        description: Set(input.description.clone()),
                        kind: Set(ResourceKind::Video),
                        duration: Set(None),
                        pages: Set(None),
                        author: Set(None),
                        published_date: Set(Some(now.into())),
                        status: Set(Visibility::Show),
                        created_at: Set(now.into()),
                        updated_at: Set(None),
                        deleted_at: Set(None),
                    };
                    let video = resource_repo.create(txn, model).await?;

                    let file = resource_file::ActiveModel {
                        id: Set(id_gen.generate()),
                        resource_id: Set(resource_id.clone()),
                        file_type: Set(stored.extension.clone()),
                        file_path: Set(stored.path.clone()),
                        is_downloadable: Set(input.is_downloadable),
                        created_at: Set(now.into()),
                        updated_at: Set(None),
                        deleted_at: Set(None),
                    };
                    let file = resource_repo.create_file(txn, file).await?;
                    Some((video, vec![file]))
                } else {
                    None
                };

                let model = course::ActiveModel {
                    id: Set(course_id.clone()),
                    name: Set(name),
                    description: Set(input.description),
                    sub_description: Set(input.sub_description),
                    additional_info: Set(input.additional_info),
                    instructor: Set(input.instructor),
                    resource_id: Set(resource_id),
                    img_id: Set(image_id),
                    created_at: Set(now.into()),
                    updated_at: Set(None),
                    deleted_at: Set(None),
                };
                let course = course_repo.create(txn, model).await?;

                let industries =
                    reconcile_industries(txn, &course_repo, &id_gen, &course_id, &input.industries)
                        .await?;

                Ok(build_response(course, image, industries, video, vec![]))
            })
        })
        .await
    }

    /// Update a course; new image/video uploads replace the old slots.
    pub async fn update(&self, id: &str, input: UpdateCourseInput) -> AppResult<CourseResponse> {
        let id = id.to_string();
        let new_image_id = input.image.as_ref().map(|_| self.id_gen.generate());
        let new_resource_id = input.video.as_ref().map(|_| self.id_gen.generate());
        let id_gen = self.id_gen.clone();

        let course_repo = self.course_repo.clone();
        let resource_repo = self.resource_repo.clone();
        let image_repo = self.image_repo.clone();
        let review_repo = self.review_repo.clone();

        let (response, stale_files) = in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let course = course_repo
                    .find_by_id_in(txn, &id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

                let old_img_id = course.img_id.clone();
                let old_resource_id = course.resource_id.clone();
                let mut active: course::ActiveModel = course.into();
                let mut stale_files: Vec<String> = Vec::new();

                let mut name = None;
                if let Some(new_name) = input.name {
                    let new_name = new_name.trim().to_string();
                    if new_name.is_empty() {
                        return Err(AppError::Validation("Name is required".to_string()));
                    }
                    active.name = Set(new_name.clone());
                    name = Some(new_name);
                }
                if let Some(description) = input.description.clone() {
                    active.description = Set(Some(description));
                }
                if let Some(sub_description) = input.sub_description {
                    active.sub_description = Set(Some(sub_description));
                }
                if let Some(additional_info) = input.additional_info {
                    active.additional_info = Set(Some(additional_info));
                }
                if let Some(instructor) = input.instructor {
                    active.instructor = Set(Some(instructor));
                }

                // Image slot: replace, don't merge.
                let mut image = None;
                if let (Some(stored), Some(image_id)) = (&input.image, &new_image_id) {
                    if let Some(old_id) = &old_img_id
                        && let Some(old) = image_repo.find_by_id_in(txn, old_id).await?
                    {
                        stale_files.push(old.image_path.clone());
                        image_repo.delete(txn, &old.id).await?;
                    }

                    let model = image::ActiveModel {
                        id: Set(image_id.clone()),
                        ref_id: Set(Some(id.clone())),
                        ref_type: Set(Some(REF_TYPE.to_string())),
                        image_path: Set(stored.path.clone()),
                        created_at: Set(Utc::now().into()),
                        updated_at: Set(None),
                        deleted_at: Set(None),
                    };
                    image = Some(image_repo.create(txn, model).await?);
                    active.img_id = Set(Some(image_id.clone()));
                }

                // Video slot: drop the old resource and its files, then
                // create a fresh one.
                let mut video = None;
                if let (Some(stored), Some(resource_id)) = (&input.video, &new_resource_id) {
                    if let Some(old_id) = &old_resource_id {
                        if let Some(old_file) = resource_repo.find_file_for_in(txn, old_id).await? {
                            stale_files.push(old_file.file_path.clone());
                        }
                        resource_repo.delete_files_for(txn, old_id).await?;
                        resource_repo.delete(txn, old_id).await?;
                    }

                    let now = Utc::now();
                    let title = name.clone().unwrap_or_else(|| match &active.name {
                        sea_orm::ActiveValue::Set(n) | sea_orm::ActiveValue::Unchanged(n) => {
                            n.clone()
                        }
                        sea_orm::ActiveValue::NotSet => String::new(),
                    });

                    let model = resource::ActiveModel {
                        id: Set(resource_id.clone()),
                        title: Set(title),
                        description: Set(input.description.clone()),
                        kind: Set(ResourceKind::Video),
                        duration: Set(None),
                        pages: Set(None),
                        author: Set(None),
                        published_date: Set(Some(now.into())),
                        status: Set(Visibility::Show),
                        created_at: Set(now.into()),
                        updated_at: Set(None),
                        deleted_at: Set(None),
                    };
                    let new_resource = resource_repo.create(txn, model).await?;

                    let file = resource_file::ActiveModel {
                        id: Set(id_gen.generate()),
                        resource_id: Set(resource_id.clone()),
                        file_type: Set(stored.extension.clone()),
                        file_path: Set(stored.path.clone()),
                        is_downloadable: Set(input.is_downloadable.unwrap_or(false)),
                        created_at: Set(now.into()),
                        updated_at: Set(None),
                        deleted_at: Set(None),
                    };
                    let file = resource_repo.create_file(txn, file).await?;
                    video = Some((new_resource, vec![file]));
                    active.resource_id = Set(Some(resource_id.clone()));
                }

                active.updated_at = Set(Some(Utc::now().into()));
                let course = course_repo.update(txn, active).await?;

                let industries = if let Some(wanted) = &input.industries {
                    reconcile_industries(txn, &course_repo, &id_gen, &id, wanted).await?
                } else {
                    course_repo.industries_for_in(txn, &id).await?
                };

                // Resolve unreplaced slots for the response.
                if image.is_none()
                    && let Some(img_id) = &course.img_id
                {
                    image = image_repo.find_by_id_in(txn, img_id).await?;
                }
                if video.is_none()
                    && let Some(resource_id) = &course.resource_id
                    && let Some(res) = resource_repo.find_by_id(resource_id).await?
                {
                    let files = resource_repo.files_for(resource_id).await?;
                    video = Some((res, files));
                }

                let reviews = review_repo.find_by_course(&id).await?;
                Ok((
                    build_response(
                        course,
                        image,
                        industries,
                        video,
                        reviews.into_iter().map(Into::into).collect(),
                    ),
                    stale_files,
                ))
            })
        })
        .await?;

        for path in stale_files {
            self.storage.delete_best_effort(&path).await;
        }

        Ok(response)
    }

    /// Delete a course and everything hanging off it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = id.to_string();
        let course_repo = self.course_repo.clone();
        let resource_repo = self.resource_repo.clone();
        let image_repo = self.image_repo.clone();

        let stale_files = in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let course = course_repo
                    .find_by_id_in(txn, &id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

                let mut paths = Vec::new();

                if let Some(img_id) = &course.img_id
                    && let Some(img) = image_repo.find_by_id_in(txn, img_id).await?
                {
                    paths.push(img.image_path.clone());
                    image_repo.delete(txn, &img.id).await?;
                }
                image_repo.delete_for_owner(txn, REF_TYPE, &id).await?;

                if let Some(resource_id) = &course.resource_id {
                    if let Some(file) = resource_repo.find_file_for_in(txn, resource_id).await? {
                        paths.push(file.file_path.clone());
                    }
                    resource_repo.delete_files_for(txn, resource_id).await?;
                    resource_repo.delete(txn, resource_id).await?;
                }

                course_repo.delete_industries_for(txn, &id).await?;
                // Reviews fall with the course through the FK cascade.
                course_repo.delete(txn, &id).await?;

                Ok(paths)
            })
        })
        .await?;

        for path in stale_files {
            self.storage.delete_best_effort(&path).await;
        }

        Ok(())
    }

    /// List courses with their associations, plus the full industry list.
    pub async fn list(
        &self,
        search: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<CourseResponse>, Vec<IndustryResponse>, u64)> {
        let total = self.course_repo.count(search).await?;
        let courses = self.course_repo.find_page(search, offset, limit).await?;

        let mut responses = Vec::with_capacity(courses.len());
        for course in courses {
            responses.push(self.assemble(course).await?);
        }

        let industries = self
            .course_repo
            .all_industries()
            .await?
            .into_iter()
            .map(industry_response)
            .collect();

        Ok((responses, industries, total))
    }

    /// Fetch a single course with its associations.
    pub async fn get(&self, id: &str) -> AppResult<CourseResponse> {
        let course = self.course_repo.get_by_id(id).await?;
        self.assemble(course).await
    }

    async fn assemble(&self, course: course::Model) -> AppResult<CourseResponse> {
        let image = match &course.img_id {
            Some(img_id) => self.image_repo.find_by_id(img_id).await?,
            None => None,
        };

        let video = match &course.resource_id {
            Some(resource_id) => match self.resource_repo.find_by_id(resource_id).await? {
                Some(res) => {
                    let files = self.resource_repo.files_for(resource_id).await?;
                    Some((res, files))
                }
                None => None,
            },
            None => None,
        };

        let industries = self.course_repo.industries_for(&course.id).await?;
        let reviews = self.review_repo.find_by_course(&course.id).await?;

        Ok(build_response(
            course,
            image,
            industries,
            video,
            reviews.into_iter().map(Into::into).collect(),
        ))
    }
}

/// Bring the industry labels of a course in line with the wanted name list.
///
/// Same symmetric-difference shape as tag reconciliation, keyed on
/// (`course_id`, name).
async fn reconcile_industries<C: ConnectionTrait>(
    db: &C,
    course_repo: &CourseRepository,
    id_gen: &IdGenerator,
    course_id: &str,
    wanted: &[String],
) -> AppResult<Vec<industry::Model>> {
    let wanted: Vec<String> = wanted
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();

    let existing = course_repo.industries_for_in(db, course_id).await?;

    for row in &existing {
        if !wanted.contains(&row.name) {
            course_repo.delete_industry(db, &row.id).await?;
        }
    }

    let existing_names: Vec<String> = existing.iter().map(|r| r.name.clone()).collect();
    for name in &wanted {
        if !existing_names.contains(name) {
            let model = industry::ActiveModel {
                id: Set(id_gen.generate()),
                name: Set(name.clone()),
                course_id: Set(course_id.to_string()),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
                deleted_at: Set(None),
            };
            course_repo.create_industry(db, model).await?;
        }
    }

    course_repo.industries_for_in(db, course_id).await
}

fn industry_response(row: industry::Model) -> IndustryResponse {
    IndustryResponse {
        id: row.id,
        name: row.name,
    }
}

fn build_response(
    course: course::Model,
    image: Option<image::Model>,
    industries: Vec<industry::Model>,
    video: Option<(resource::Model, Vec<resource_file::Model>)>,
    reviews: Vec<ReviewResponse>,
) -> CourseResponse {
    CourseResponse {
        id: course.id,
        name: course.name,
        description: course.description,
        sub_description: course.sub_description,
        additional_info: course.additional_info,
        instructor: course.instructor,
        image: image.map(|i| NewsImageResponse {
            id: i.id,
            image_path: i.image_path,
        }),
        industries: industries.into_iter().map(industry_response).collect(),
        resource: video.map(|(res, files)| {
            ResourceResponse::from_parts(
                res,
                files.into_iter().map(ResourceFileResponse::from).collect(),
            )
        }),
        reviews,
        created_at: course.created_at.to_rfc3339(),
        updated_at: course.updated_at.map(|d| d.to_rfc3339()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campus_common::config::StorageConfig;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn service_over(db: sea_orm::DatabaseConnection) -> CourseService {
        let db = Arc::new(db);
        CourseService::new(
            Arc::clone(&db),
            CourseRepository::new(Arc::clone(&db)),
            ResourceRepository::new(Arc::clone(&db)),
            ImageRepository::new(Arc::clone(&db)),
            ReviewRepository::new(Arc::clone(&db)),
            StorageService::new(&StorageConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_over(db);

        let result = service
            .create(CreateCourseInput {
                name: " ".to_string(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_missing_course_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<course::Model>::new()])
            .into_connection();
        let service = service_over(db);

        let result = service.get("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
