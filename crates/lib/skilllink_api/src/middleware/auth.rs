//! Authentication and role middleware.
//!
//! `require_auth` turns a bearer access token into the stored identity and
//! attaches it to the request; `require_roles` then checks that identity
//! against a route's allow-list. Layer `require_roles` inside `require_auth`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use skilllink_core::auth::authorize;
use skilllink_core::auth::gate::bearer_token;
use skilllink_core::models::auth::{Identity, Role};

use crate::AppState;
use crate::error::AppError;

/// The identity resolved by `require_auth`, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

/// Roles allowed through `require_roles`.
#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(pub &'static [Role]);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the
/// access token, loads the identity and injects `AuthenticatedUser`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str())
        .transpose()
        .map_err(|_| AppError::Unauthorized("Malformed authorization header".into()))?;
    // Owned so no borrow of the (non-Sync) request is held across the await.
    let token = bearer_token(header)?.to_owned();

    let identity = state.gate.authenticate(&token).await?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser(identity));

    Ok(next.run(request).await)
}

/// Axum middleware: refuses the request unless the authenticated identity
/// holds one of the allowed roles.
pub async fn require_roles(
    State(AllowedRoles(allowed)): State<AllowedRoles>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|user| &user.0);
    authorize(allowed, identity)?;
    Ok(next.run(request).await)
}
