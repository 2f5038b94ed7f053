//! Mentorship request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use skilllink_core::mentorships;
use skilllink_core::models::mentorship::Mentorship;
use skilllink_core::models::{ListQuery, Page};
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ListParams, MentorshipRequestBody, MentorshipUpdateBody, MessageResponse};

/// `GET /api/mentorships` — public; `search` filters on status.
pub async fn list_mentorships_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Page<Mentorship>>> {
    let page = state.mentorships.list(&ListQuery::from(params)).await?;
    Ok(Json(page))
}

/// `GET /api/mentorships/{id}`
pub async fn get_mentorship_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Mentorship>> {
    state
        .mentorships
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Mentorship request not found".into()))
}

/// `POST /api/mentorships` — learner asks for mentoring on a skill.
pub async fn create_mentorship_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(learner)): Extension<AuthenticatedUser>,
    AppJson(body): AppJson<MentorshipRequestBody>,
) -> AppResult<(StatusCode, Json<Mentorship>)> {
    let request = mentorships::request_mentorship(
        state.mentorships.as_ref(),
        state.skills.as_ref(),
        &learner,
        body.into(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// `PATCH /api/mentorships/{id}` — mentor answers, learner edits, admin moderates.
pub async fn update_mentorship_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(actor)): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<MentorshipUpdateBody>,
) -> AppResult<Json<Mentorship>> {
    let request = mentorships::update_mentorship(
        state.mentorships.as_ref(),
        state.skills.as_ref(),
        &actor,
        id,
        body.into(),
    )
    .await?;
    Ok(Json(request))
}

/// `DELETE /api/mentorships/{id}` — admin moderation.
pub async fn delete_mentorship_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    mentorships::delete_mentorship(state.mentorships.as_ref(), id).await?;
    Ok(Json(MessageResponse::ok(
        "Mentorship request deleted successfully",
    )))
}
