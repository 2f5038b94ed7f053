//! Mentorship requests.
//!
//! Learners ask to be mentored on a skill; the mentor who owns the skill
//! accepts or rejects. The requesting learner may edit the message while the
//! request is still pending. Admins may change anything.

pub mod memory;
pub mod queries;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::auth::{Identity, Role};
use crate::models::mentorship::{Mentorship, MentorshipStatus, NewMentorship};
use crate::models::{ListQuery, Page};
use crate::skills::{SkillError, SkillStore};

#[derive(Debug, Error)]
pub enum MentorshipError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

impl From<SkillError> for MentorshipError {
    fn from(e: SkillError) -> Self {
        match e {
            SkillError::Validation(msg) => MentorshipError::Validation(msg),
            SkillError::NotFound(msg) => MentorshipError::NotFound(msg),
            SkillError::Forbidden(msg) => MentorshipError::Forbidden(msg),
            SkillError::DbError(e) => MentorshipError::DbError(e),
        }
    }
}

#[async_trait]
pub trait MentorshipStore: Send + Sync {
    async fn create(&self, new: NewMentorship) -> Result<Mentorship, MentorshipError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Mentorship>, MentorshipError>;

    /// Newest first, optionally filtered on status.
    async fn list(&self, query: &ListQuery) -> Result<Page<Mentorship>, MentorshipError>;

    async fn save(&self, request: &Mentorship) -> Result<bool, MentorshipError>;

    async fn delete(&self, id: Uuid) -> Result<bool, MentorshipError>;
}

/// A new request as submitted by a learner.
#[derive(Debug, Clone, Default)]
pub struct MentorshipInput {
    pub skill_id: Option<Uuid>,
    pub message: Option<String>,
}

/// Partial update of an existing request.
#[derive(Debug, Clone, Default)]
pub struct MentorshipChange {
    pub status: Option<MentorshipStatus>,
    pub message: Option<String>,
}

fn not_found() -> MentorshipError {
    MentorshipError::NotFound("Mentorship request not found".into())
}

/// Record a pending request from `learner` for an existing skill.
pub async fn request_mentorship(
    store: &dyn MentorshipStore,
    skills: &dyn SkillStore,
    learner: &Identity,
    input: MentorshipInput,
) -> Result<Mentorship, MentorshipError> {
    let skill_id = input
        .skill_id
        .ok_or_else(|| MentorshipError::Validation("Skill is required".into()))?;
    if skills.find_by_id(skill_id).await?.is_none() {
        return Err(MentorshipError::NotFound("Skill not found".into()));
    }

    let request = store
        .create(NewMentorship {
            learner_id: learner.id,
            skill_id,
            message: input.message.as_deref().map(str::trim).unwrap_or_default().to_string(),
        })
        .await?;
    info!(mentorship_id = %request.id, learner_id = %learner.id, %skill_id, "mentorship requested");
    Ok(request)
}

/// Apply `change` on behalf of `actor`.
pub async fn update_mentorship(
    store: &dyn MentorshipStore,
    skills: &dyn SkillStore,
    actor: &Identity,
    id: Uuid,
    change: MentorshipChange,
) -> Result<Mentorship, MentorshipError> {
    let mut request = store.find_by_id(id).await?.ok_or_else(not_found)?;

    match actor.role {
        Role::Admin => {}
        Role::Learner => {
            if request.learner_id != actor.id {
                return Err(MentorshipError::Forbidden(
                    "Only the requesting learner can change this request".into(),
                ));
            }
            if change.status.is_some() {
                return Err(MentorshipError::Forbidden(
                    "Only the skill's mentor can accept or reject a request".into(),
                ));
            }
            if request.status != MentorshipStatus::Pending {
                return Err(MentorshipError::Validation(
                    "Request has already been answered".into(),
                ));
            }
        }
        Role::Mentor => {
            let skill = skills
                .find_by_id(request.skill_id)
                .await?
                .ok_or_else(|| MentorshipError::NotFound("Skill not found".into()))?;
            if skill.mentor_id != actor.id {
                return Err(MentorshipError::Forbidden(
                    "Only the skill's mentor can answer this request".into(),
                ));
            }
            if change.message.is_some() {
                return Err(MentorshipError::Forbidden(
                    "Only the requesting learner can edit the message".into(),
                ));
            }
        }
    }

    if let Some(status) = change.status {
        request.status = status;
    }
    if let Some(message) = change.message {
        request.message = message.trim().to_string();
    }
    request.updated_at = Utc::now();

    if !store.save(&request).await? {
        return Err(not_found());
    }
    info!(mentorship_id = %request.id, status = %request.status, actor_id = %actor.id, "mentorship updated");
    Ok(request)
}

pub async fn delete_mentorship(
    store: &dyn MentorshipStore,
    id: Uuid,
) -> Result<(), MentorshipError> {
    if !store.delete(id).await? {
        return Err(not_found());
    }
    info!(mentorship_id = %id, "mentorship deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::IdentityStore;
    use crate::memory::MemoryDb;
    use crate::models::auth::NewIdentity;
    use crate::models::skill::NewSkill;

    async fn person(db: &MemoryDb, email: &str, role: Role) -> Identity {
        IdentityStore::create(
            db,
            NewIdentity {
                name: email.into(),
                email: email.into(),
                password_hash: String::new(),
                role,
            },
        )
        .await
        .unwrap()
    }

    struct Fixture {
        db: MemoryDb,
        mentor: Identity,
        learner: Identity,
        skill_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let db = MemoryDb::new();
        let mentor = person(&db, "m@x.com", Role::Mentor).await;
        let learner = person(&db, "l@x.com", Role::Learner).await;
        let skill_id = SkillStore::create(
            &db,
            NewSkill {
                title: "Rust".into(),
                description: "Lifetimes".into(),
                price: 20.0,
                category: vec![],
                mentor_id: mentor.id,
            },
        )
        .await
        .unwrap()
        .id;
        Fixture {
            db,
            mentor,
            learner,
            skill_id,
        }
    }

    async fn pending(f: &Fixture) -> Mentorship {
        request_mentorship(
            &f.db,
            &f.db,
            &f.learner,
            MentorshipInput {
                skill_id: Some(f.skill_id),
                message: Some("  please  ".into()),
            },
        )
        .await
        .unwrap()
    }

    fn status(status: MentorshipStatus) -> MentorshipChange {
        MentorshipChange {
            status: Some(status),
            message: None,
        }
    }

    fn message(text: &str) -> MentorshipChange {
        MentorshipChange {
            status: None,
            message: Some(text.into()),
        }
    }

    #[tokio::test]
    async fn request_starts_pending_for_the_caller() {
        let f = fixture().await;
        let request = pending(&f).await;
        assert_eq!(request.status, MentorshipStatus::Pending);
        assert_eq!(request.learner_id, f.learner.id);
        assert_eq!(request.message, "please");
    }

    #[tokio::test]
    async fn request_requires_an_existing_skill() {
        let f = fixture().await;
        let missing = request_mentorship(&f.db, &f.db, &f.learner, MentorshipInput::default()).await;
        assert!(matches!(missing, Err(MentorshipError::Validation(_))));

        let unknown = request_mentorship(
            &f.db,
            &f.db,
            &f.learner,
            MentorshipInput {
                skill_id: Some(Uuid::nil()),
                message: None,
            },
        )
        .await;
        assert!(matches!(unknown, Err(MentorshipError::NotFound(_))));
    }

    #[tokio::test]
    async fn owning_mentor_answers_and_others_cannot() {
        let f = fixture().await;
        let request = pending(&f).await;

        let stranger = person(&f.db, "other@x.com", Role::Mentor).await;
        assert!(matches!(
            update_mentorship(&f.db, &f.db, &stranger, request.id, status(MentorshipStatus::Accepted)).await,
            Err(MentorshipError::Forbidden(_))
        ));
        assert!(matches!(
            update_mentorship(&f.db, &f.db, &f.mentor, request.id, message("hi")).await,
            Err(MentorshipError::Forbidden(_))
        ));

        let accepted = update_mentorship(
            &f.db,
            &f.db,
            &f.mentor,
            request.id,
            status(MentorshipStatus::Accepted),
        )
        .await
        .unwrap();
        assert_eq!(accepted.status, MentorshipStatus::Accepted);
    }

    #[tokio::test]
    async fn learner_edits_own_pending_request_only() {
        let f = fixture().await;
        let request = pending(&f).await;

        assert!(matches!(
            update_mentorship(&f.db, &f.db, &f.learner, request.id, status(MentorshipStatus::Accepted)).await,
            Err(MentorshipError::Forbidden(_))
        ));

        let other = person(&f.db, "other@x.com", Role::Learner).await;
        assert!(matches!(
            update_mentorship(&f.db, &f.db, &other, request.id, message("mine now")).await,
            Err(MentorshipError::Forbidden(_))
        ));

        let edited = update_mentorship(&f.db, &f.db, &f.learner, request.id, message(" weekends "))
            .await
            .unwrap();
        assert_eq!(edited.message, "weekends");

        update_mentorship(&f.db, &f.db, &f.mentor, request.id, status(MentorshipStatus::Rejected))
            .await
            .unwrap();
        assert!(matches!(
            update_mentorship(&f.db, &f.db, &f.learner, request.id, message("again?")).await,
            Err(MentorshipError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn admin_changes_anything_and_deletes() {
        let f = fixture().await;
        let request = pending(&f).await;
        let admin = person(&f.db, "root@x.com", Role::Admin).await;

        let changed = update_mentorship(
            &f.db,
            &f.db,
            &admin,
            request.id,
            MentorshipChange {
                status: Some(MentorshipStatus::Rejected),
                message: Some("moderated".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(changed.status, MentorshipStatus::Rejected);
        assert_eq!(changed.message, "moderated");

        delete_mentorship(&f.db, request.id).await.unwrap();
        assert!(matches!(
            delete_mentorship(&f.db, request.id).await,
            Err(MentorshipError::NotFound(_))
        ));
    }
}
