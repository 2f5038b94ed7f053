//! In-process database behind the in-memory stores.
//!
//! Backs tests and local development. A single lock guards every table, so
//! deletes cascade atomically the same way the foreign keys cascade in
//! PostgreSQL, and the refresh-token swap gets the atomicity the SQL store
//! gets from its row lock.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::auth::Identity;
use crate::models::mentorship::Mentorship;
use crate::models::review::Review;
use crate::models::skill::Skill;
use crate::models::{ListQuery, Page};

/// Implements every store trait; share one instance across stores.
#[derive(Default)]
pub struct MemoryDb {
    pub(crate) tables: RwLock<Tables>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) identities: HashMap<Uuid, Identity>,
    pub(crate) skills: HashMap<Uuid, Skill>,
    pub(crate) mentorships: HashMap<Uuid, Mentorship>,
    pub(crate) reviews: HashMap<Uuid, Review>,
}

impl Tables {
    /// Remove an identity with its skills, requests and reviews.
    pub(crate) fn remove_identity(&mut self, id: Uuid) -> bool {
        if self.identities.remove(&id).is_none() {
            return false;
        }
        let owned: Vec<Uuid> = self
            .skills
            .values()
            .filter(|s| s.mentor_id == id)
            .map(|s| s.id)
            .collect();
        for skill_id in owned {
            self.remove_skill(skill_id);
        }
        self.mentorships.retain(|_, m| m.learner_id != id);
        self.reviews.retain(|_, r| r.learner_id != id);
        true
    }

    /// Remove a skill with the requests and reviews that reference it.
    pub(crate) fn remove_skill(&mut self, id: Uuid) -> bool {
        if self.skills.remove(&id).is_none() {
            return false;
        }
        self.mentorships.retain(|_, m| m.skill_id != id);
        self.reviews.retain(|_, r| r.skill_id != id);
        true
    }
}

/// Sort newest first by `(created_at, id)` and cut out the requested page.
pub(crate) fn newest_first<T: Clone>(
    mut rows: Vec<&T>,
    query: &ListQuery,
    key: impl Fn(&T) -> (DateTime<Utc>, Uuid),
) -> Page<T> {
    rows.sort_by_key(|row| Reverse(key(*row)));
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
        .take(query.limit as usize)
        .cloned()
        .collect();
    Page::new(items, total, query)
}
