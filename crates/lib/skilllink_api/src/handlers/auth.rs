//! Authentication request handlers.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::{Extension, Json};
use skilllink_core::models::auth::PublicIdentity;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    LoginRequest, MessageResponse, RefreshRequest, RegisterRequest, TokenResponse, UserResponse,
};

/// `POST /api/auth/register` — create a learner account.
pub async fn register_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .gate
        .register(
            body.name.as_deref().unwrap_or_default(),
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "User registered successfully".into(),
            user,
        }),
    ))
}

/// `POST /api/auth/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let outcome = state
        .gate
        .login(
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(TokenResponse::new(
        outcome.tokens,
        Some(outcome.identity),
    )))
}

/// `POST /api/auth/refresh-token` — exchange a refresh token for a new pair.
///
/// A missing or unreadable body counts as a missing token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let token = body
        .ok()
        .and_then(|Json(body)| body.token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Refresh token is required".into()))?;
    let tokens = state.gate.refresh(&token).await?;
    Ok(Json(TokenResponse::new(tokens, None)))
}

/// `POST /api/auth/logout` — revoke the caller's refresh token. Requires authentication.
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
) -> AppResult<Json<MessageResponse>> {
    state.gate.logout(identity.id).await?;
    Ok(Json(MessageResponse::ok("User logged out successfully")))
}

/// `GET /api/auth/me` — the authenticated identity.
pub async fn me_handler(
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
) -> Json<PublicIdentity> {
    Json(PublicIdentity::from(identity))
}
