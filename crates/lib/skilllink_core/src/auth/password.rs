//! Password hashing via bcrypt.

use super::AuthError;

/// bcrypt cost factor used in production.
pub const BCRYPT_COST: u32 = 12;

/// Lowest cost bcrypt accepts.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Hash a password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

/// Runs bcrypt off the async worker threads.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: BCRYPT_COST }
    }
}

impl PasswordHasher {
    /// Hasher with a custom cost. Anything below the bcrypt minimum is raised to it.
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.max(MIN_BCRYPT_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AuthError::Internal(format!("hash task: {e}")))?
    }

    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("verify task: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cost_is_twelve() {
        assert_eq!(PasswordHasher::default().cost(), 12);
        assert_eq!(PasswordHasher::with_cost(1).cost(), MIN_BCRYPT_COST);
    }

    #[tokio::test]
    async fn hash_is_not_plaintext_and_verifies() {
        let hasher = PasswordHasher::with_cost(MIN_BCRYPT_COST);
        let hash = hasher.hash("secret1").await.unwrap();
        assert_ne!(hash, "secret1");
        assert!(hasher.verify("secret1", &hash).await.unwrap());
        assert!(!hasher.verify("secret2", &hash).await.unwrap());
    }

    #[test]
    fn production_hash_records_cost() {
        let hash = hash_password("secret1", BCRYPT_COST).unwrap();
        assert!(hash.starts_with("$2b$12$"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("secret1", "not-a-bcrypt-hash").is_err());
    }
}
