//! Role-based authorization filter.

use super::AuthError;
use crate::models::auth::{Identity, Role};

/// Allow `identity` through if its role is one of `allowed`.
///
/// Pure policy check: no IO, no side effects. A missing identity means the
/// authentication step did not run and is refused as unauthenticated.
pub fn authorize(allowed: &[Role], identity: Option<&Identity>) -> Result<(), AuthError> {
    let identity =
        identity.ok_or_else(|| AuthError::Unauthenticated("Not authenticated".into()))?;
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(format!(
            "role '{}' may not perform this action",
            identity.role
        )))
    }
}
