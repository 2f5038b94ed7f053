//! # skilllink_core
//!
//! Core domain logic for Skill-Link: identities, credentials, access
//! control, the skill catalogue, mentorship requests and reviews.

pub mod auth;
pub mod memory;
pub mod mentorships;
pub mod migrate;
pub mod models;
pub mod reviews;
pub mod skills;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
