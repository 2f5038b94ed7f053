//! PostgreSQL-backed review store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ReviewError, ReviewStore};
use crate::auth::queries::like_pattern;
use crate::models::review::{NewReview, Review};
use crate::models::{ListQuery, Page};
use crate::uuid::uuidv7;

const REVIEW_COLUMNS: &str = "id, learner_id, skill_id, rating, comment, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    learner_id: Uuid,
    skill_id: Uuid,
    rating: i16,
    comment: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            learner_id: row.learner_id,
            skill_id: row.skill_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Review store over the `reviews` table.
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn create(&self, new: NewReview) -> Result<Review, ReviewError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "INSERT INTO reviews (id, learner_id, skill_id, rating, comment) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(uuidv7())
        .bind(new.learner_id)
        .bind(new.skill_id)
        .bind(new.rating)
        .bind(&new.comment)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, ReviewError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Review::from))
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Review>, ReviewError> {
        let pattern = query.search.as_deref().map(like_pattern);
        let filter = "$1::text IS NULL OR comment ILIKE $1";

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM reviews WHERE {filter}"
        ))
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE {filter} \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(i64::from(query.limit))
        .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(Review::from).collect(),
            u64::try_from(total).unwrap_or(0),
            query,
        ))
    }

    async fn save(&self, review: &Review) -> Result<bool, ReviewError> {
        let result = sqlx::query(
            "UPDATE reviews SET rating = $2, comment = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(review.id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ReviewError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
