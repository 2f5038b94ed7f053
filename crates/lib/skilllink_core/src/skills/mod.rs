//! Skill catalogue.
//!
//! Mentors publish priced skill listings; anyone can browse them. Role
//! gating happens at the HTTP layer, ownership checks happen here.

pub mod memory;
pub mod queries;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::auth::Identity;
use crate::models::skill::{NewSkill, Skill, SkillUpdate};
use crate::models::{ListQuery, Page};

/// Skill catalogue errors.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

#[async_trait]
pub trait SkillStore: Send + Sync {
    async fn create(&self, new: NewSkill) -> Result<Skill, SkillError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Skill>, SkillError>;

    /// Newest first, optionally filtered on title or category.
    async fn list(&self, query: &ListQuery) -> Result<Page<Skill>, SkillError>;

    /// Persist the full row of an updated skill.
    async fn save(&self, skill: &Skill) -> Result<bool, SkillError>;

    async fn delete(&self, id: Uuid) -> Result<bool, SkillError>;
}

/// Listing input as submitted by a mentor.
#[derive(Debug, Clone, Default)]
pub struct SkillInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<Vec<String>>,
}

fn required_text(value: Option<&str>, field: &str) -> Result<String, SkillError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(SkillError::Validation(format!("{field} is required"))),
    }
}

fn valid_price(price: f64) -> Result<f64, SkillError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(SkillError::Validation("Price cannot be negative".into()))
    }
}

fn clean_categories(categories: Vec<String>) -> Vec<String> {
    categories
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Validate and store a new listing owned by `mentor`.
pub async fn create_skill(
    store: &dyn SkillStore,
    mentor: &Identity,
    input: SkillInput,
) -> Result<Skill, SkillError> {
    let title = required_text(input.title.as_deref(), "Title")?;
    let description = required_text(input.description.as_deref(), "Description")?;
    let price = valid_price(
        input
            .price
            .ok_or_else(|| SkillError::Validation("Price per hour is required".into()))?,
    )?;
    let category = clean_categories(input.category.unwrap_or_default());

    let skill = store
        .create(NewSkill {
            title,
            description,
            price,
            category,
            mentor_id: mentor.id,
        })
        .await?;
    info!(skill_id = %skill.id, mentor_id = %mentor.id, "skill created");
    Ok(skill)
}

/// Apply a partial update. Only the mentor who owns the listing may edit it.
pub async fn update_skill(
    store: &dyn SkillStore,
    actor: &Identity,
    id: Uuid,
    input: SkillInput,
) -> Result<Skill, SkillError> {
    let mut skill = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| SkillError::NotFound("Skill not found".into()))?;

    if skill.mentor_id != actor.id {
        return Err(SkillError::Forbidden(
            "Only the owning mentor can update this skill".into(),
        ));
    }

    let update = SkillUpdate {
        title: input
            .title
            .as_deref()
            .map(|t| required_text(Some(t), "Title"))
            .transpose()?,
        description: input
            .description
            .as_deref()
            .map(|d| required_text(Some(d), "Description"))
            .transpose()?,
        price: input.price.map(valid_price).transpose()?,
        category: input.category.map(clean_categories),
    };
    skill.apply(update);
    skill.updated_at = chrono::Utc::now();

    if !store.save(&skill).await? {
        return Err(SkillError::NotFound("Skill not found".into()));
    }
    Ok(skill)
}

/// Remove a listing.
pub async fn delete_skill(store: &dyn SkillStore, id: Uuid) -> Result<(), SkillError> {
    if !store.delete(id).await? {
        return Err(SkillError::NotFound("Skill not found".into()));
    }
    info!(skill_id = %id, "skill deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::memory::MemoryDb;
    use super::*;
    use crate::models::auth::Role;
    use crate::uuid::uuidv7;

    fn person(role: Role) -> Identity {
        let now = Utc::now();
        Identity {
            id: uuidv7(),
            name: "Grace".into(),
            email: "g@x.com".into(),
            password_hash: String::new(),
            role,
            bio: None,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn input() -> SkillInput {
        SkillInput {
            title: Some(" Rust mentoring ".into()),
            description: Some("Ownership and lifetimes".into()),
            price: Some(40.0),
            category: Some(vec![" programming ".into(), "".into()]),
        }
    }

    #[tokio::test]
    async fn create_trims_and_records_owner() {
        let store = MemoryDb::new();
        let mentor = person(Role::Mentor);
        let skill = create_skill(&store, &mentor, input()).await.unwrap();
        assert_eq!(skill.title, "Rust mentoring");
        assert_eq!(skill.category, vec!["programming".to_string()]);
        assert_eq!(skill.mentor_id, mentor.id);
    }

    #[tokio::test]
    async fn create_validates_fields() {
        let store = MemoryDb::new();
        let mentor = person(Role::Mentor);
        for bad in [
            SkillInput {
                title: None,
                ..input()
            },
            SkillInput {
                description: Some("  ".into()),
                ..input()
            },
            SkillInput {
                price: None,
                ..input()
            },
            SkillInput {
                price: Some(-1.0),
                ..input()
            },
            SkillInput {
                price: Some(f64::NAN),
                ..input()
            },
        ] {
            assert!(matches!(
                create_skill(&store, &mentor, bad).await,
                Err(SkillError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn only_owner_updates() {
        let store = MemoryDb::new();
        let owner = person(Role::Mentor);
        let skill = create_skill(&store, &owner, input()).await.unwrap();

        let other = person(Role::Mentor);
        let patch = SkillInput {
            price: Some(55.0),
            ..SkillInput::default()
        };
        assert!(matches!(
            update_skill(&store, &other, skill.id, patch.clone()).await,
            Err(SkillError::Forbidden(_))
        ));

        let updated = update_skill(&store, &owner, skill.id, patch).await.unwrap();
        assert_eq!(updated.price, 55.0);
        assert_eq!(updated.title, "Rust mentoring");
        let stored = store.find_by_id(skill.id).await.unwrap().unwrap();
        assert_eq!(stored.price, 55.0);
    }

    #[tokio::test]
    async fn missing_skill_is_not_found() {
        let store = MemoryDb::new();
        let mentor = person(Role::Mentor);
        assert!(matches!(
            update_skill(&store, &mentor, uuidv7(), SkillInput::default()).await,
            Err(SkillError::NotFound(_))
        ));
        assert!(matches!(
            delete_skill(&store, uuidv7()).await,
            Err(SkillError::NotFound(_))
        ));
    }
}
