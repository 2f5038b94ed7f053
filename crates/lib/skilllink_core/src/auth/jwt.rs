//! JWT credential codec.
//!
//! Access and refresh tokens share one claim shape but are signed with
//! independent secrets and carry different lifetimes, so a token of one
//! kind never verifies as the other.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{AuthError, CredentialKind};
use crate::models::auth::{Identity, TokenClaims, TokenPair};
use crate::uuid::uuidv7;

/// Access token lifetime: 15 minutes.
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 15 * 60;

/// Refresh token lifetime: 7 days.
pub const REFRESH_TOKEN_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

/// The two credential kinds the codec mints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn lifetime(self) -> Duration {
        match self {
            TokenKind::Access => Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS),
            TokenKind::Refresh => Duration::seconds(REFRESH_TOKEN_EXPIRY_SECS),
        }
    }

    fn label(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Signs and verifies HS256 tokens. Immutable once built.
#[derive(Clone)]
pub struct TokenCodec {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from the two signing secrets.
    ///
    /// Fails if either secret is empty or both are the same.
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Result<Self, AuthError> {
        if access_secret.is_empty() || refresh_secret.is_empty() {
            return Err(AuthError::Internal("token signing secret is empty".into()));
        }
        if access_secret == refresh_secret {
            return Err(AuthError::Internal(
                "access and refresh secrets must differ".into(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            access: KeyPair::from_secret(access_secret),
            refresh: KeyPair::from_secret(refresh_secret),
            validation,
        })
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Sign a 15-minute access token for `identity`.
    pub fn issue_access_credential(&self, identity: &Identity) -> Result<String, AuthError> {
        self.issue_at(TokenKind::Access, identity, Utc::now())
    }

    /// Sign a 7-day refresh token for `identity`.
    pub fn issue_refresh_credential(&self, identity: &Identity) -> Result<String, AuthError> {
        self.issue_at(TokenKind::Refresh, identity, Utc::now())
    }

    /// Sign both tokens at once.
    pub fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        Ok(TokenPair {
            access_token: self.issue_at(TokenKind::Access, identity, now)?,
            refresh_token: self.issue_at(TokenKind::Refresh, identity, now)?,
        })
    }

    /// Sign a token of `kind` as if issued at `issued_at`.
    pub fn issue_at(
        &self,
        kind: TokenKind,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: identity.id.to_string(),
            email: identity.email.clone(),
            role: identity.role,
            jti: uuidv7().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + kind.lifetime()).timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.keys(kind).encoding,
        )
        .map_err(|e| AuthError::Signing(format!("{} token: {e}", kind.label())))
    }

    /// Verify an access token, returning its claims.
    pub fn verify_access_credential(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify(TokenKind::Access, token)
    }

    /// Verify a refresh token, returning its claims.
    pub fn verify_refresh_credential(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify(TokenKind::Refresh, token)
    }

    fn verify(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.keys(kind).decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(kind = kind.label(), error = %e, "token rejected");
                AuthError::InvalidCredential(CredentialKind::Token)
            })
    }
}

/// SHA-256 hex digest of a refresh token, the form persisted on the identity.
pub fn refresh_token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
