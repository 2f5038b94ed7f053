//! PostgreSQL-backed skill store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{SkillError, SkillStore};
use crate::auth::queries::like_pattern;
use crate::models::skill::{NewSkill, Skill};
use crate::models::{ListQuery, Page};
use crate::uuid::uuidv7;

const SKILL_COLUMNS: &str =
    "id, title, description, price, category, mentor_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct SkillRow {
    id: Uuid,
    title: String,
    description: String,
    price: f64,
    category: Vec<String>,
    mentor_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SkillRow> for Skill {
    fn from(row: SkillRow) -> Self {
        Skill {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            category: row.category,
            mentor_id: row.mentor_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Skill store over the `skills` table.
#[derive(Clone)]
pub struct PgSkillStore {
    pool: PgPool,
}

impl PgSkillStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SkillStore for PgSkillStore {
    async fn create(&self, new: NewSkill) -> Result<Skill, SkillError> {
        let row = sqlx::query_as::<_, SkillRow>(&format!(
            "INSERT INTO skills (id, title, description, price, category, mentor_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SKILL_COLUMNS}"
        ))
        .bind(uuidv7())
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.category)
        .bind(new.mentor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Skill>, SkillError> {
        let row = sqlx::query_as::<_, SkillRow>(&format!(
            "SELECT {SKILL_COLUMNS} FROM skills WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Skill::from))
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Skill>, SkillError> {
        let pattern = query.search.as_deref().map(like_pattern);
        let filter = "$1::text IS NULL OR title ILIKE $1 \
                      OR EXISTS (SELECT 1 FROM unnest(category) c WHERE c ILIKE $1)";

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM skills WHERE {filter}"
        ))
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, SkillRow>(&format!(
            "SELECT {SKILL_COLUMNS} FROM skills WHERE {filter} \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(i64::from(query.limit))
        .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(Skill::from).collect(),
            u64::try_from(total).unwrap_or(0),
            query,
        ))
    }

    async fn save(&self, skill: &Skill) -> Result<bool, SkillError> {
        let result = sqlx::query(
            "UPDATE skills SET title = $2, description = $3, price = $4, category = $5, \
             updated_at = $6 WHERE id = $1",
        )
        .bind(skill.id)
        .bind(&skill.title)
        .bind(&skill.description)
        .bind(skill.price)
        .bind(&skill.category)
        .bind(skill.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SkillError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
