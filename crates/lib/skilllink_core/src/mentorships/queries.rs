//! PostgreSQL-backed mentorship store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{MentorshipError, MentorshipStore};
use crate::auth::queries::like_pattern;
use crate::models::mentorship::{Mentorship, NewMentorship};
use crate::models::{ListQuery, Page};
use crate::uuid::uuidv7;

const MENTORSHIP_COLUMNS: &str =
    "id, learner_id, skill_id, status, message, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct MentorshipRow {
    id: Uuid,
    learner_id: Uuid,
    skill_id: Uuid,
    status: String,
    message: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MentorshipRow> for Mentorship {
    type Error = MentorshipError;

    fn try_from(row: MentorshipRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|e| {
            MentorshipError::DbError(sqlx::Error::Decode(
                format!("mentorship {}: {e}", row.id).into(),
            ))
        })?;
        Ok(Mentorship {
            id: row.id,
            learner_id: row.learner_id,
            skill_id: row.skill_id,
            status,
            message: row.message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Mentorship store over the `mentorships` table.
#[derive(Clone)]
pub struct PgMentorshipStore {
    pool: PgPool,
}

impl PgMentorshipStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MentorshipStore for PgMentorshipStore {
    async fn create(&self, new: NewMentorship) -> Result<Mentorship, MentorshipError> {
        let row = sqlx::query_as::<_, MentorshipRow>(&format!(
            "INSERT INTO mentorships (id, learner_id, skill_id, message) \
             VALUES ($1, $2, $3, $4) RETURNING {MENTORSHIP_COLUMNS}"
        ))
        .bind(uuidv7())
        .bind(new.learner_id)
        .bind(new.skill_id)
        .bind(&new.message)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Mentorship>, MentorshipError> {
        let row = sqlx::query_as::<_, MentorshipRow>(&format!(
            "SELECT {MENTORSHIP_COLUMNS} FROM mentorships WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Mentorship::try_from).transpose()
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Mentorship>, MentorshipError> {
        let pattern = query.search.as_deref().map(like_pattern);
        let filter = "$1::text IS NULL OR status ILIKE $1";

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM mentorships WHERE {filter}"
        ))
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, MentorshipRow>(&format!(
            "SELECT {MENTORSHIP_COLUMNS} FROM mentorships WHERE {filter} \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(i64::from(query.limit))
        .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(Mentorship::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), query))
    }

    async fn save(&self, request: &Mentorship) -> Result<bool, MentorshipError> {
        let result = sqlx::query(
            "UPDATE mentorships SET status = $2, message = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(request.id)
        .bind(request.status.as_str())
        .bind(&request.message)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MentorshipError> {
        let result = sqlx::query("DELETE FROM mentorships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
