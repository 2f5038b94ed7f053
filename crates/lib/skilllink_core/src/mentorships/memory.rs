//! Mentorship store over the in-process database.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{MentorshipError, MentorshipStore};
use crate::memory::{MemoryDb, newest_first};
use crate::models::mentorship::{Mentorship, MentorshipStatus, NewMentorship};
use crate::models::{ListQuery, Page};
use crate::uuid::uuidv7;

#[async_trait]
impl MentorshipStore for MemoryDb {
    async fn create(&self, new: NewMentorship) -> Result<Mentorship, MentorshipError> {
        let now = Utc::now();
        let request = Mentorship {
            id: uuidv7(),
            learner_id: new.learner_id,
            skill_id: new.skill_id,
            status: MentorshipStatus::Pending,
            message: new.message,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .mentorships
            .insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Mentorship>, MentorshipError> {
        Ok(self.tables.read().await.mentorships.get(&id).cloned())
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Mentorship>, MentorshipError> {
        let tables = self.tables.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);
        let matching: Vec<&Mentorship> = tables
            .mentorships
            .values()
            .filter(|m| needle.as_deref().is_none_or(|n| m.status.as_str().contains(n)))
            .collect();
        Ok(newest_first(matching, query, |m| (m.created_at, m.id)))
    }

    async fn save(&self, request: &Mentorship) -> Result<bool, MentorshipError> {
        let mut tables = self.tables.write().await;
        match tables.mentorships.get_mut(&request.id) {
            Some(existing) => {
                *existing = request.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MentorshipError> {
        Ok(self.tables.write().await.mentorships.remove(&id).is_some())
    }
}
