//! API server configuration.

use thiserror::Error;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Default PostgreSQL connection URL.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/skilllink";

/// Configuration problems detected at start-up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingSecret(&'static str),

    #[error("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ")]
    SharedSecret,
}

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:5000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// Secret signing 15-minute access tokens.
    pub access_token_secret: String,
    /// Secret signing 7-day refresh tokens.
    pub refresh_token_secret: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("pg_connection_url", &self.pg_connection_url)
            .finish_non_exhaustive()
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable               | Default                               |
    /// |------------------------|---------------------------------------|
    /// | `BIND_ADDR`            | `127.0.0.1:5000`                      |
    /// | `DATABASE_URL`         | `postgres://localhost:5432/skilllink` |
    /// | `ACCESS_TOKEN_SECRET`  | required                              |
    /// | `REFRESH_TOKEN_SECRET` | required                              |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingSecret(key))
        };
        let config = Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            pg_connection_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            access_token_secret: secret("ACCESS_TOKEN_SECRET")?,
            refresh_token_secret: secret("REFRESH_TOKEN_SECRET")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants on an already-built config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret("ACCESS_TOKEN_SECRET"));
        }
        if self.refresh_token_secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret("REFRESH_TOKEN_SECRET"));
        }
        if self.access_token_secret == self.refresh_token_secret {
            return Err(ConfigError::SharedSecret);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secrets_are_set() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("ACCESS_TOKEN_SECRET", "a"),
            ("REFRESH_TOKEN_SECRET", "r"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.pg_connection_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn missing_secrets_fail_fast() {
        assert_eq!(
            ApiConfig::from_lookup(lookup(&[("REFRESH_TOKEN_SECRET", "r")])).unwrap_err(),
            ConfigError::MissingSecret("ACCESS_TOKEN_SECRET")
        );
        assert_eq!(
            ApiConfig::from_lookup(lookup(&[
                ("ACCESS_TOKEN_SECRET", "a"),
                ("REFRESH_TOKEN_SECRET", "  "),
            ]))
            .unwrap_err(),
            ConfigError::MissingSecret("REFRESH_TOKEN_SECRET")
        );
    }

    #[test]
    fn shared_secret_is_rejected() {
        assert_eq!(
            ApiConfig::from_lookup(lookup(&[
                ("ACCESS_TOKEN_SECRET", "same"),
                ("REFRESH_TOKEN_SECRET", "same"),
            ]))
            .unwrap_err(),
            ConfigError::SharedSecret
        );
    }

    #[test]
    fn debug_hides_secrets() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("ACCESS_TOKEN_SECRET", "top-secret-a"),
            ("REFRESH_TOKEN_SECRET", "top-secret-r"),
        ]))
        .unwrap();
        assert!(!format!("{config:?}").contains("top-secret"));
    }
}
