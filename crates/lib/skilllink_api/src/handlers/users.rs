//! Admin user management handlers.

use axum::Json;
use axum::extract::State;
use skilllink_core::models::auth::PublicIdentity;
use skilllink_core::models::{ListQuery, Page};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery};
use crate::models::{ListParams, MessageResponse};

/// `GET /api/users` — paginated, searchable user list.
pub async fn list_users_handler(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Page<PublicIdentity>>> {
    let query = ListQuery::from(params);
    let page = state.gate.store().list(&query).await?;
    Ok(Json(page.map(PublicIdentity::from)))
}

/// `GET /api/users/{id}`
pub async fn get_user_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<PublicIdentity>> {
    let identity = state
        .gate
        .store()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(PublicIdentity::from(identity)))
}

/// `DELETE /api/users/{id}` — removes the user with their session, skills,
/// mentorship requests and reviews.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    if !state.gate.store().delete(id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!(user_id = %id, "user deleted");
    Ok(Json(MessageResponse::ok("User deleted successfully")))
}
