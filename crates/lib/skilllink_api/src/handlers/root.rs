//! Service root and fallback.

use axum::Json;
use axum::http::StatusCode;

use crate::models::ErrorResponse;

/// `GET /` — plain-text welcome.
pub async fn welcome() -> String {
    format!("Welcome to Skill-Link API v{}", skilllink_core::version())
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not_found".into(),
            message: "Route not found".into(),
        }),
    )
}
