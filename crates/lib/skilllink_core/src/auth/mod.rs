//! Authentication and authorization logic.
//!
//! Provides the credential codec, password hashing, the identity store
//! seam and the auth gate that ties them together. Shared by
//! `skilllink_api` and the server binary.

pub mod authorize;
pub mod gate;
pub mod jwt;
pub mod memory;
pub mod password;
pub mod queries;
pub mod store;

use std::fmt;

use thiserror::Error;

pub use authorize::authorize;
pub use gate::AuthGate;
pub use jwt::TokenCodec;
pub use password::PasswordHasher;
pub use store::IdentityStore;

/// Which credential failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Password,
    Token,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::Password => f.write_str("incorrect password"),
            CredentialKind::Token => f.write_str("invalid or expired token"),
        }
    }
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredential(CredentialKind),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this error stems from an unexpected failure rather than the
    /// caller's input or session state.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Signing(_) | AuthError::DbError(_) | AuthError::Internal(_)
        )
    }
}
