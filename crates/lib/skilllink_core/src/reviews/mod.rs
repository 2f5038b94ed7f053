//! Skill reviews.
//!
//! Learners rate skills from 1 to 5 with an optional comment. A review can
//! be edited by the learner who wrote it or by an admin.

pub mod memory;
pub mod queries;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::auth::{Identity, Role};
use crate::models::review::{MAX_RATING, MIN_RATING, NewReview, Review};
use crate::models::{ListQuery, Page};
use crate::skills::{SkillError, SkillStore};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

impl From<SkillError> for ReviewError {
    fn from(e: SkillError) -> Self {
        match e {
            SkillError::Validation(msg) => ReviewError::Validation(msg),
            SkillError::NotFound(msg) => ReviewError::NotFound(msg),
            SkillError::Forbidden(msg) => ReviewError::Forbidden(msg),
            SkillError::DbError(e) => ReviewError::DbError(e),
        }
    }
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn create(&self, new: NewReview) -> Result<Review, ReviewError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, ReviewError>;

    /// Newest first, optionally filtered on the comment text.
    async fn list(&self, query: &ListQuery) -> Result<Page<Review>, ReviewError>;

    async fn save(&self, review: &Review) -> Result<bool, ReviewError>;

    async fn delete(&self, id: Uuid) -> Result<bool, ReviewError>;
}

/// Review fields as submitted. `skill_id` is only read on creation.
#[derive(Debug, Clone, Default)]
pub struct ReviewInput {
    pub skill_id: Option<Uuid>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

fn valid_rating(rating: i64) -> Result<i16, ReviewError> {
    i16::try_from(rating)
        .ok()
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        .ok_or_else(|| {
            ReviewError::Validation(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}"
            ))
        })
}

fn not_found() -> ReviewError {
    ReviewError::NotFound("Review not found".into())
}

/// Store a review by `learner` of an existing skill.
pub async fn write_review(
    store: &dyn ReviewStore,
    skills: &dyn SkillStore,
    learner: &Identity,
    input: ReviewInput,
) -> Result<Review, ReviewError> {
    let skill_id = input
        .skill_id
        .ok_or_else(|| ReviewError::Validation("Skill is required".into()))?;
    let rating = valid_rating(
        input
            .rating
            .ok_or_else(|| ReviewError::Validation("Rating is required".into()))?,
    )?;
    if skills.find_by_id(skill_id).await?.is_none() {
        return Err(ReviewError::NotFound("Skill not found".into()));
    }

    let review = store
        .create(NewReview {
            learner_id: learner.id,
            skill_id,
            rating,
            comment: input.comment.as_deref().map(str::trim).unwrap_or_default().to_string(),
        })
        .await?;
    info!(review_id = %review.id, learner_id = %learner.id, %skill_id, rating, "review written");
    Ok(review)
}

/// Change rating or comment. Only the author or an admin may edit.
pub async fn update_review(
    store: &dyn ReviewStore,
    actor: &Identity,
    id: Uuid,
    input: ReviewInput,
) -> Result<Review, ReviewError> {
    let mut review = store.find_by_id(id).await?.ok_or_else(not_found)?;

    if actor.role != Role::Admin && review.learner_id != actor.id {
        return Err(ReviewError::Forbidden(
            "Only the reviewing learner can update this review".into(),
        ));
    }
    if input.skill_id.is_some_and(|skill_id| skill_id != review.skill_id) {
        return Err(ReviewError::Validation(
            "A review cannot be moved to another skill".into(),
        ));
    }

    if let Some(rating) = input.rating {
        review.rating = valid_rating(rating)?;
    }
    if let Some(comment) = input.comment {
        review.comment = comment.trim().to_string();
    }
    review.updated_at = Utc::now();

    if !store.save(&review).await? {
        return Err(not_found());
    }
    Ok(review)
}

pub async fn delete_review(store: &dyn ReviewStore, id: Uuid) -> Result<(), ReviewError> {
    if !store.delete(id).await? {
        return Err(not_found());
    }
    info!(review_id = %id, "review deleted");
    Ok(())
}
