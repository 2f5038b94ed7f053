//! Request and response bodies.
//!
//! Field names are camelCase on the wire. Request fields are optional so
//! that missing input reaches the core validation and comes back as a 400
//! with a readable message.

use serde::{Deserialize, Serialize};
use skilllink_core::auth::jwt::ACCESS_TOKEN_EXPIRY_SECS;
use skilllink_core::models::ListQuery;
use skilllink_core::mentorships::{MentorshipChange, MentorshipInput};
use skilllink_core::models::auth::{PublicIdentity, TokenPair};
use skilllink_core::models::mentorship::MentorshipStatus;
use skilllink_core::reviews::ReviewInput;
use skilllink_core::skills::SkillInput;
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// `POST /api/auth/refresh-token` body; the refresh token travels in JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub message: String,
    pub user: PublicIdentity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicIdentity>,
}

impl TokenResponse {
    pub fn new(tokens: TokenPair, user: Option<PublicIdentity>) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: ACCESS_TOKEN_EXPIRY_SECS,
            token_type: "Bearer".to_string(),
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// `?page=&limit=&search=` on list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        ListQuery::new(params.page, params.limit, params.search)
    }
}

/// Create/update body for skills. On update every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<Vec<String>>,
}

impl From<SkillRequest> for SkillInput {
    fn from(req: SkillRequest) -> Self {
        SkillInput {
            title: req.title,
            description: req.description,
            price: req.price,
            category: req.category,
        }
    }
}

/// `POST /api/mentorships` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipRequestBody {
    #[serde(default)]
    pub skill_id: Option<Uuid>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<MentorshipRequestBody> for MentorshipInput {
    fn from(body: MentorshipRequestBody) -> Self {
        MentorshipInput {
            skill_id: body.skill_id,
            message: body.message,
        }
    }
}

/// `PATCH /api/mentorships/{id}` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentorshipUpdateBody {
    #[serde(default)]
    pub status: Option<MentorshipStatus>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<MentorshipUpdateBody> for MentorshipChange {
    fn from(body: MentorshipUpdateBody) -> Self {
        MentorshipChange {
            status: body.status,
            message: body.message,
        }
    }
}

/// Create/update body for reviews.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[serde(default)]
    pub skill_id: Option<Uuid>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl From<ReviewRequest> for ReviewInput {
    fn from(req: ReviewRequest) -> Self {
        ReviewInput {
            skill_id: req.skill_id,
            rating: req.rating,
            comment: req.comment,
        }
    }
}
