//! Skill catalogue handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use skilllink_core::models::skill::Skill;
use skilllink_core::models::{ListQuery, Page};
use skilllink_core::skills;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ListParams, MessageResponse, SkillRequest};

/// `GET /api/skills` — public browse.
pub async fn list_skills_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Page<Skill>>> {
    let page = state.skills.list(&ListQuery::from(params)).await?;
    Ok(Json(page))
}

/// `GET /api/skills/{id}`
pub async fn get_skill_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Skill>> {
    state
        .skills
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Skill not found".into()))
}

/// `POST /api/skills` — mentor publishes a listing.
pub async fn create_skill_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(mentor)): Extension<AuthenticatedUser>,
    AppJson(body): AppJson<SkillRequest>,
) -> AppResult<(StatusCode, Json<Skill>)> {
    let skill = skills::create_skill(state.skills.as_ref(), &mentor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

/// `PATCH /api/skills/{id}` — owning mentor edits a listing.
pub async fn update_skill_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(mentor)): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<SkillRequest>,
) -> AppResult<Json<Skill>> {
    let skill = skills::update_skill(state.skills.as_ref(), &mentor, id, body.into()).await?;
    Ok(Json(skill))
}

/// `DELETE /api/skills/{id}` — admin moderation.
pub async fn delete_skill_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    skills::delete_skill(state.skills.as_ref(), id).await?;
    Ok(Json(MessageResponse::ok("Skill deleted successfully")))
}
