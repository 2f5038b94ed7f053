//! Request handlers.

pub mod auth;
pub mod mentorships;
pub mod reviews;
pub mod root;
pub mod skills;
pub mod users;
