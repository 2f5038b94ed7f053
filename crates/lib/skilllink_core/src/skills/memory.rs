//! Skill store over the in-process database.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{SkillError, SkillStore};
use crate::memory::{MemoryDb, newest_first};
use crate::models::skill::{NewSkill, Skill};
use crate::models::{ListQuery, Page};
use crate::uuid::uuidv7;

fn matches_search(skill: &Skill, needle: &str) -> bool {
    skill.title.to_lowercase().contains(needle)
        || skill
            .category
            .iter()
            .any(|c| c.to_lowercase().contains(needle))
}

#[async_trait]
impl SkillStore for MemoryDb {
    async fn create(&self, new: NewSkill) -> Result<Skill, SkillError> {
        let now = Utc::now();
        let skill = Skill {
            id: uuidv7(),
            title: new.title,
            description: new.description,
            price: new.price,
            category: new.category,
            mentor_id: new.mentor_id,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .skills
            .insert(skill.id, skill.clone());
        Ok(skill)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Skill>, SkillError> {
        Ok(self.tables.read().await.skills.get(&id).cloned())
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Skill>, SkillError> {
        let tables = self.tables.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);
        let matching: Vec<&Skill> = tables
            .skills
            .values()
            .filter(|s| needle.as_deref().is_none_or(|n| matches_search(s, n)))
            .collect();
        Ok(newest_first(matching, query, |s| (s.created_at, s.id)))
    }

    async fn save(&self, skill: &Skill) -> Result<bool, SkillError> {
        let mut tables = self.tables.write().await;
        match tables.skills.get_mut(&skill.id) {
            Some(existing) => {
                *existing = skill.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SkillError> {
        Ok(self.tables.write().await.remove_skill(id))
    }
}
