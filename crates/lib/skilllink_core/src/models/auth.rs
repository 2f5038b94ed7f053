//! Authentication domain models.
//!
//! These are internal domain models. The API layer converts them into its
//! own request/response shapes; only [`PublicIdentity`] is safe to expose.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of roles an identity can hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Learner,
    Mentor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Learner, Role::Mentor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Learner => "learner",
            Role::Mentor => "mentor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a role name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learner" => Ok(Role::Learner),
            "mentor" => Ok(Role::Mentor),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A registered principal as stored.
#[derive(Clone)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    /// Lower-cased, unique.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub bio: Option<String>,
    /// SHA-256 digest of the single currently valid refresh token.
    pub refresh_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("has_session", &self.refresh_token_hash.is_some())
            .finish_non_exhaustive()
    }
}

/// Fields required to create an identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Identity without its credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIdentity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Identity> for PublicIdentity {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.name.clone(),
            email: identity.email.clone(),
            role: identity.role,
            bio: identity.bio.clone(),
            created_at: identity.created_at,
            updated_at: identity.updated_at,
        }
    }
}

impl From<Identity> for PublicIdentity {
    fn from(identity: Identity) -> Self {
        Self::from(&identity)
    }
}

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — identity ID.
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Unique token ID; keeps two tokens minted in the same second distinct.
    pub jti: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

impl TokenClaims {
    /// Parse the subject as an identity ID.
    pub fn subject_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// A freshly minted access + refresh token pair.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPair { .. }")
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub tokens: TokenPair,
    pub identity: PublicIdentity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_eq!(
            "superuser".parse::<Role>(),
            Err(UnknownRole("superuser".into()))
        );
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Mentor).unwrap(), "\"mentor\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn public_identity_drops_credentials() {
        let now = Utc::now();
        let identity = Identity {
            id: Uuid::now_v7(),
            name: "Ada".into(),
            email: "a@x.com".into(),
            password_hash: "$2b$12$hash".into(),
            role: Role::Learner,
            bio: None,
            refresh_token_hash: Some("digest".into()),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(PublicIdentity::from(&identity)).unwrap();
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["role"], "learner");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("refreshTokenHash").is_none());
        assert!(!format!("{identity:?}").contains("$2b$"));
    }

    #[test]
    fn subject_id_parses_uuid() {
        let id = Uuid::now_v7();
        let claims = TokenClaims {
            sub: id.to_string(),
            email: "a@x.com".into(),
            role: Role::Learner,
            jti: "j".into(),
            iat: 0,
            exp: 0,
        };
        assert_eq!(claims.subject_id(), Some(id));
        let bad = TokenClaims {
            sub: "not-a-uuid".into(),
            ..claims
        };
        assert_eq!(bad.subject_id(), None);
    }
}
