//! Review store over the in-process database.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{ReviewError, ReviewStore};
use crate::memory::{MemoryDb, newest_first};
use crate::models::review::{NewReview, Review};
use crate::models::{ListQuery, Page};
use crate::uuid::uuidv7;

#[async_trait]
impl ReviewStore for MemoryDb {
    async fn create(&self, new: NewReview) -> Result<Review, ReviewError> {
        let now = Utc::now();
        let review = Review {
            id: uuidv7(),
            learner_id: new.learner_id,
            skill_id: new.skill_id,
            rating: new.rating,
            comment: new.comment,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .reviews
            .insert(review.id, review.clone());
        Ok(review)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, ReviewError> {
        Ok(self.tables.read().await.reviews.get(&id).cloned())
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Review>, ReviewError> {
        let tables = self.tables.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);
        let matching: Vec<&Review> = tables
            .reviews
            .values()
            .filter(|r| {
                needle
                    .as_deref()
                    .is_none_or(|n| r.comment.to_lowercase().contains(n))
            })
            .collect();
        Ok(newest_first(matching, query, |r| (r.created_at, r.id)))
    }

    async fn save(&self, review: &Review) -> Result<bool, ReviewError> {
        let mut tables = self.tables.write().await;
        match tables.reviews.get_mut(&review.id) {
            Some(existing) => {
                *existing = review.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ReviewError> {
        Ok(self.tables.write().await.reviews.remove(&id).is_some())
    }
}
