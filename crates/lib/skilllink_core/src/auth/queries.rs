//! PostgreSQL-backed identity store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use super::store::IdentityStore;
use crate::models::auth::{Identity, NewIdentity, Role};
use crate::models::{ListQuery, Page};
use crate::uuid::uuidv7;

const IDENTITY_COLUMNS: &str = "id, name, email, password_hash, role, bio, refresh_token_hash, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    bio: Option<String>,
    refresh_token_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = AuthError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| AuthError::Internal(format!("user {}: {e}", row.id)))?;
        Ok(Identity {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            bio: row.bio,
            refresh_token_hash: row.refresh_token_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE.
pub(crate) fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Identity store over the `users` table.
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Identity::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Identity::try_from).transpose()
    }

    async fn create(&self, new: NewIdentity) -> Result<Identity, AuthError> {
        let result = sqlx::query_as::<_, IdentityRow>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {IDENTITY_COLUMNS}"
        ))
        .bind(uuidv7())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Identity::try_from(row),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AuthError::Conflict("User already exists".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn replace_refresh_token(&self, id: Uuid, token_hash: &str) -> Result<bool, AuthError> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token_hash = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn compare_and_swap_refresh_token(
        &self,
        id: Uuid,
        expected_hash: &str,
        new_hash: &str,
    ) -> Result<bool, AuthError> {
        // The row lock taken by UPDATE serialises racers; the loser re-reads
        // the new digest and matches zero rows.
        let result = sqlx::query(
            "UPDATE users SET refresh_token_hash = $3, updated_at = now() \
             WHERE id = $1 AND refresh_token_hash = $2",
        )
        .bind(id)
        .bind(expected_hash)
        .bind(new_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn clear_refresh_token(&self, id: Uuid) -> Result<bool, AuthError> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token_hash = NULL, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Identity>, AuthError> {
        let pattern = query.search.as_deref().map(like_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users \
             WHERE $1::text IS NULL OR name ILIKE $1 OR email ILIKE $1",
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM users \
             WHERE $1::text IS NULL OR name ILIKE $1 OR email ILIKE $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(i64::from(query.limit))
        .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(Identity::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), query))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
