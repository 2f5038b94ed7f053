//! Review handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use skilllink_core::models::review::Review;
use skilllink_core::models::{ListQuery, Page};
use skilllink_core::reviews;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ListParams, MessageResponse, ReviewRequest};

/// `GET /api/reviews`
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Page<Review>>> {
    let page = state.reviews.list(&ListQuery::from(params)).await?;
    Ok(Json(page))
}

/// `GET /api/reviews/{id}`
pub async fn get_review_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Review>> {
    state
        .reviews
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Review not found".into()))
}

/// `POST /api/reviews` — learner rates a skill.
pub async fn create_review_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(learner)): Extension<AuthenticatedUser>,
    AppJson(body): AppJson<ReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let review = reviews::write_review(
        state.reviews.as_ref(),
        state.skills.as_ref(),
        &learner,
        body.into(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// `PATCH /api/reviews/{id}` — author edits, admin moderates.
pub async fn update_review_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(actor)): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<ReviewRequest>,
) -> AppResult<Json<Review>> {
    let review = reviews::update_review(state.reviews.as_ref(), &actor, id, body.into()).await?;
    Ok(Json(review))
}

/// `DELETE /api/reviews/{id}` — admin moderation.
pub async fn delete_review_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    reviews::delete_review(state.reviews.as_ref(), id).await?;
    Ok(Json(MessageResponse::ok("Review deleted successfully")))
}
