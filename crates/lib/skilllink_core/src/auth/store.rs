//! Identity persistence seam.
//!
//! The auth gate only needs point lookups, creation and a handful of
//! updates on the single refresh-token field. Refresh rotation goes through
//! [`IdentityStore::compare_and_swap_refresh_token`] so two concurrent
//! refreshes presenting the same token cannot both win.

use async_trait::async_trait;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::{Identity, NewIdentity};
use crate::models::{ListQuery, Page};

#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Look up by (already normalised) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, AuthError>;

    /// Insert a new identity. Fails with [`AuthError::Conflict`] if the email is taken.
    async fn create(&self, new: NewIdentity) -> Result<Identity, AuthError>;

    /// Unconditionally set the refresh-token digest. Returns `false` if the
    /// identity does not exist.
    async fn replace_refresh_token(&self, id: Uuid, token_hash: &str) -> Result<bool, AuthError>;

    /// Set the refresh-token digest to `new_hash` only if it currently equals
    /// `expected_hash`. Returns whether the swap happened.
    async fn compare_and_swap_refresh_token(
        &self,
        id: Uuid,
        expected_hash: &str,
        new_hash: &str,
    ) -> Result<bool, AuthError>;

    /// Clear the refresh-token digest. Returns `false` if the identity does not exist.
    async fn clear_refresh_token(&self, id: Uuid) -> Result<bool, AuthError>;

    /// Newest first, optionally filtered on name or email.
    async fn list(&self, query: &ListQuery) -> Result<Page<Identity>, AuthError>;

    /// Remove an identity and, with it, its stored refresh token.
    async fn delete(&self, id: Uuid) -> Result<bool, AuthError>;
}
