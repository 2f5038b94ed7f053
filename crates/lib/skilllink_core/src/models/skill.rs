//! Skill listing models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A skill a mentor offers, priced per hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: Vec<String>,
    pub mentor_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new listing. The owner comes from the authenticated mentor.
#[derive(Debug, Clone)]
pub struct NewSkill {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: Vec<String>,
    pub mentor_id: Uuid,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct SkillUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<Vec<String>>,
}

impl Skill {
    /// Apply a partial update in place.
    pub fn apply(&mut self, update: SkillUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
    }
}
