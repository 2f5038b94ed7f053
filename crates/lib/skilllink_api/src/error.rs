//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use skilllink_core::auth::{AuthError, CredentialKind};
use skilllink_core::mentorships::MentorshipError;
use skilllink_core::reviews::ReviewError;
use skilllink_core::skills::SkillError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredential(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::Conflict(m) => (StatusCode::BAD_REQUEST, "conflict", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::InvalidCredential(m) => {
                (StatusCode::BAD_REQUEST, "invalid_credential", m.as_str())
            }
            AppError::InvalidToken(m) => (StatusCode::FORBIDDEN, "invalid_token", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::Internal(detail) => {
                error!(error = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::Conflict(msg) => AppError::Conflict(msg),
            AuthError::NotFound(msg) => AppError::NotFound(msg),
            AuthError::InvalidCredential(CredentialKind::Password) => {
                AppError::InvalidCredential("Incorrect password".into())
            }
            AuthError::InvalidCredential(CredentialKind::Token) => {
                AppError::InvalidToken("Invalid or expired refresh token".into())
            }
            AuthError::Unauthenticated(msg) | AuthError::Unauthorized(msg) => {
                AppError::Unauthorized(msg)
            }
            AuthError::Forbidden(msg) => AppError::Forbidden(msg),
            e @ (AuthError::Signing(_) | AuthError::DbError(_) | AuthError::Internal(_)) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<SkillError> for AppError {
    fn from(e: SkillError) -> Self {
        match e {
            SkillError::Validation(msg) => AppError::Validation(msg),
            SkillError::NotFound(msg) => AppError::NotFound(msg),
            SkillError::Forbidden(msg) => AppError::Forbidden(msg),
            SkillError::DbError(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<MentorshipError> for AppError {
    fn from(e: MentorshipError) -> Self {
        match e {
            MentorshipError::Validation(msg) => AppError::Validation(msg),
            MentorshipError::NotFound(msg) => AppError::NotFound(msg),
            MentorshipError::Forbidden(msg) => AppError::Forbidden(msg),
            MentorshipError::DbError(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<ReviewError> for AppError {
    fn from(e: ReviewError) -> Self {
        match e {
            ReviewError::Validation(msg) => AppError::Validation(msg),
            ReviewError::NotFound(msg) => AppError::NotFound(msg),
            ReviewError::Forbidden(msg) => AppError::Forbidden(msg),
            ReviewError::DbError(e) => AppError::Internal(e.to_string()),
        }
    }
}
