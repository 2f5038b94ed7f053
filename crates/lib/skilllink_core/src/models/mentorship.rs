//! Mentorship request models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a mentorship request. New requests start as `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorshipStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl MentorshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MentorshipStatus::Pending => "pending",
            MentorshipStatus::Accepted => "accepted",
            MentorshipStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for MentorshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mentorship status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for MentorshipStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MentorshipStatus::Pending),
            "accepted" => Ok(MentorshipStatus::Accepted),
            "rejected" => Ok(MentorshipStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A learner's request to be mentored on a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentorship {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub skill_id: Uuid,
    pub status: MentorshipStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMentorship {
    pub learner_id: Uuid,
    pub skill_id: Uuid,
    pub message: String,
}
