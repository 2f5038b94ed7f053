//! Auth gate — registration, login, refresh rotation and logout.
//!
//! Per identity the stored refresh token moves through
//! `absent --login--> present(T) --refresh--> present(T') --logout--> absent`.
//! Only the digest of the current token is stored; a refresh token that
//! verifies but no longer matches that digest has been superseded or
//! logged out and is refused.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::jwt::{TokenCodec, refresh_token_digest};
use super::password::PasswordHasher;
use super::store::IdentityStore;
use super::{AuthError, CredentialKind};
use crate::models::auth::{Identity, LoginOutcome, NewIdentity, PublicIdentity, Role, TokenPair};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Trim and lower-case an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Extract the token from an `Authorization` header value of the exact
/// form `Bearer <token>`.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header =
        header.ok_or_else(|| AuthError::Unauthenticated("Missing authorization header".into()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::Unauthenticated("Invalid authorization scheme".into()))?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::Unauthenticated(
            "Malformed authorization header".into(),
        ));
    }
    Ok(token)
}

/// Orchestrates the identity store, credential codec and password hasher.
pub struct AuthGate {
    store: Arc<dyn IdentityStore>,
    codec: TokenCodec,
    hasher: PasswordHasher,
}

impl AuthGate {
    pub fn new(store: Arc<dyn IdentityStore>, codec: TokenCodec, hasher: PasswordHasher) -> Self {
        Self {
            store,
            codec,
            hasher,
        }
    }

    pub fn store(&self) -> &Arc<dyn IdentityStore> {
        &self.store
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Register a learner.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<PublicIdentity, AuthError> {
        self.provision(name, email, password, Role::Learner).await
    }

    /// Create an identity with an explicit role. Registration goes through
    /// here with [`Role::Learner`]; operators use it to seed mentors and admins.
    pub async fn provision(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<PublicIdentity, AuthError> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::ValidationError(
                "All fields are required.".into(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::ValidationError(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::Conflict("User already exists.".into()));
        }

        let password_hash = self.hasher.hash(password).await?;
        let identity = self
            .store
            .create(NewIdentity {
                name: name.to_string(),
                email,
                password_hash,
                role,
            })
            .await?;

        info!(user_id = %identity.id, role = %identity.role, "identity registered");
        Ok(PublicIdentity::from(identity))
    }

    /// Check the password and open a session, replacing any previous one.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::ValidationError(
                "Email and password are required".into(),
            ));
        }

        let identity = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AuthError::NotFound("User not found".into()))?;

        if !self.hasher.verify(password, &identity.password_hash).await? {
            info!(user_id = %identity.id, "login rejected: incorrect password");
            return Err(AuthError::InvalidCredential(CredentialKind::Password));
        }

        let tokens = self.codec.issue_pair(&identity)?;
        let stored = self
            .store
            .replace_refresh_token(identity.id, &refresh_token_digest(&tokens.refresh_token))
            .await?;
        if !stored {
            return Err(AuthError::NotFound("User not found".into()));
        }

        info!(user_id = %identity.id, "login succeeded");
        Ok(LoginOutcome {
            tokens,
            identity: PublicIdentity::from(identity),
        })
    }

    /// Exchange the current refresh token for a new pair, rotating the
    /// stored token. Each refresh token is good for exactly one exchange.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.codec.verify_refresh_credential(refresh_token)?;

        let not_recognized =
            || AuthError::Unauthorized("Refresh token not recognized. Please login again".into());

        let id = claims.subject_id().ok_or_else(not_recognized)?;
        let identity = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(not_recognized)?;

        let presented = refresh_token_digest(refresh_token);
        if identity.refresh_token_hash.as_deref() != Some(presented.as_str()) {
            warn!(user_id = %id, "refresh rejected: token superseded or revoked");
            return Err(not_recognized());
        }

        let tokens = self.codec.issue_pair(&identity)?;
        let swapped = self
            .store
            .compare_and_swap_refresh_token(
                id,
                &presented,
                &refresh_token_digest(&tokens.refresh_token),
            )
            .await?;
        if !swapped {
            warn!(user_id = %id, "refresh rejected: lost rotation race");
            return Err(not_recognized());
        }

        info!(user_id = %id, "refresh token rotated");
        Ok(tokens)
    }

    /// Clear the stored refresh token. Idempotent.
    pub async fn logout(&self, identity_id: Uuid) -> Result<(), AuthError> {
        if !self.store.clear_refresh_token(identity_id).await? {
            return Err(AuthError::Unauthorized("Unauthorized".into()));
        }
        info!(user_id = %identity_id, "logged out");
        Ok(())
    }

    /// Resolve an access token to the identity it names.
    ///
    /// A token that verifies but whose identity has since been deleted is
    /// refused with [`AuthError::NotFound`].
    pub async fn authenticate(&self, access_token: &str) -> Result<Identity, AuthError> {
        let claims = self
            .codec
            .verify_access_credential(access_token)
            .map_err(|_| AuthError::Unauthenticated("Invalid or expired token".into()))?;
        let id = claims
            .subject_id()
            .ok_or_else(|| AuthError::Unauthenticated("Invalid or expired token".into()))?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::NotFound("User not found".into()))
    }
}
