//! # skilllink_api
//!
//! HTTP API library for Skill-Link.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use skilllink_core::auth::queries::PgIdentityStore;
use skilllink_core::auth::{AuthError, AuthGate, IdentityStore, PasswordHasher, TokenCodec};
use skilllink_core::memory::MemoryDb;
use skilllink_core::mentorships::MentorshipStore;
use skilllink_core::mentorships::queries::PgMentorshipStore;
use skilllink_core::models::auth::Role;
use skilllink_core::reviews::ReviewStore;
use skilllink_core::reviews::queries::PgReviewStore;
use skilllink_core::skills::SkillStore;
use skilllink_core::skills::queries::PgSkillStore;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, mentorships, reviews, root, skills, users};
use crate::middleware::auth::{AllowedRoles, require_auth, require_roles};

/// Route paths.
pub mod routes {
    pub const ROOT: &str = "/";
    pub const AUTH_REGISTER: &str = "/api/auth/register";
    pub const AUTH_LOGIN: &str = "/api/auth/login";
    pub const AUTH_REFRESH: &str = "/api/auth/refresh-token";
    pub const AUTH_LOGOUT: &str = "/api/auth/logout";
    pub const AUTH_ME: &str = "/api/auth/me";
    pub const USERS: &str = "/api/users";
    pub const USERS_ID: &str = "/api/users/{id}";
    pub const SKILLS: &str = "/api/skills";
    pub const SKILLS_ID: &str = "/api/skills/{id}";
    pub const MENTORSHIPS: &str = "/api/mentorships";
    pub const MENTORSHIPS_ID: &str = "/api/mentorships/{id}";
    pub const REVIEWS: &str = "/api/reviews";
    pub const REVIEWS_ID: &str = "/api/reviews/{id}";
}

const ADMIN: &[Role] = &[Role::Admin];
const MENTOR: &[Role] = &[Role::Mentor];
const LEARNER: &[Role] = &[Role::Learner];
const LEARNER_OR_ADMIN: &[Role] = &[Role::Learner, Role::Admin];
const ANY_ROLE: &[Role] = &[Role::Learner, Role::Mentor, Role::Admin];

/// The persistence seams behind the API.
#[derive(Clone)]
pub struct Stores {
    pub identities: Arc<dyn IdentityStore>,
    pub skills: Arc<dyn SkillStore>,
    pub mentorships: Arc<dyn MentorshipStore>,
    pub reviews: Arc<dyn ReviewStore>,
}

impl Stores {
    /// Stores over the PostgreSQL schema.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            identities: Arc::new(PgIdentityStore::new(pool.clone())),
            skills: Arc::new(PgSkillStore::new(pool.clone())),
            mentorships: Arc::new(PgMentorshipStore::new(pool.clone())),
            reviews: Arc::new(PgReviewStore::new(pool)),
        }
    }

    /// Stores sharing one in-process database.
    pub fn in_memory() -> Self {
        let db = Arc::new(MemoryDb::new());
        Self {
            identities: db.clone(),
            skills: db.clone(),
            mentorships: db.clone(),
            reviews: db,
        }
    }
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login, refresh and logout.
    pub gate: Arc<AuthGate>,
    /// Skill listings.
    pub skills: Arc<dyn SkillStore>,
    pub mentorships: Arc<dyn MentorshipStore>,
    pub reviews: Arc<dyn ReviewStore>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Wire state from explicit stores. Fails if the signing secrets are unusable.
    pub fn new(
        config: ApiConfig,
        stores: Stores,
        hasher: PasswordHasher,
    ) -> Result<Self, AuthError> {
        let codec = TokenCodec::new(
            config.access_token_secret.as_bytes(),
            config.refresh_token_secret.as_bytes(),
        )?;
        Ok(Self {
            gate: Arc::new(AuthGate::new(stores.identities, codec, hasher)),
            skills: stores.skills,
            mentorships: stores.mentorships,
            reviews: stores.reviews,
            config,
        })
    }

    /// State backed by PostgreSQL.
    pub fn postgres(config: ApiConfig, pool: PgPool) -> Result<Self, AuthError> {
        Self::new(config, Stores::postgres(pool), PasswordHasher::default())
    }

    /// State backed by an in-process database.
    pub fn in_memory(config: ApiConfig, hasher: PasswordHasher) -> Result<Self, AuthError> {
        Self::new(config, Stores::in_memory(), hasher)
    }
}

/// Run embedded database migrations.
///
/// Delegates to `skilllink_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    skilllink_core::migrate::migrate(pool).await
}

/// Wrap `router` so every route requires a bearer token and one of `roles`.
fn guarded(state: &AppState, roles: &'static [Role], router: Router<AppState>) -> Router<AppState> {
    router
        .route_layer(axum::middleware::from_fn_with_state(
            AllowedRoles(roles),
            require_roles,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::ROOT, get(root::welcome))
        .route(routes::AUTH_REGISTER, post(auth::register_handler))
        .route(routes::AUTH_LOGIN, post(auth::login_handler))
        .route(routes::AUTH_REFRESH, post(auth::refresh_handler))
        .route(routes::SKILLS, get(skills::list_skills_handler))
        .route(routes::SKILLS_ID, get(skills::get_skill_handler))
        .route(routes::MENTORSHIPS, get(mentorships::list_mentorships_handler))
        .route(routes::MENTORSHIPS_ID, get(mentorships::get_mentorship_handler))
        .route(routes::REVIEWS, get(reviews::list_reviews_handler))
        .route(routes::REVIEWS_ID, get(reviews::get_review_handler));

    // Any authenticated identity
    let authenticated = Router::new()
        .route(routes::AUTH_LOGOUT, post(auth::logout_handler))
        .route(routes::AUTH_ME, get(auth::me_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let mentor = guarded(
        &state,
        MENTOR,
        Router::new()
            .route(routes::SKILLS, post(skills::create_skill_handler))
            .route(routes::SKILLS_ID, patch(skills::update_skill_handler)),
    );

    let learner = guarded(
        &state,
        LEARNER,
        Router::new()
            .route(routes::MENTORSHIPS, post(mentorships::create_mentorship_handler))
            .route(routes::REVIEWS, post(reviews::create_review_handler)),
    );

    let any_role = guarded(
        &state,
        ANY_ROLE,
        Router::new().route(
            routes::MENTORSHIPS_ID,
            patch(mentorships::update_mentorship_handler),
        ),
    );

    let learner_or_admin = guarded(
        &state,
        LEARNER_OR_ADMIN,
        Router::new().route(routes::REVIEWS_ID, patch(reviews::update_review_handler)),
    );

    let admin = guarded(
        &state,
        ADMIN,
        Router::new()
            .route(routes::USERS, get(users::list_users_handler))
            .route(
                routes::USERS_ID,
                get(users::get_user_handler).delete(users::delete_user_handler),
            )
            .route(routes::SKILLS_ID, delete(skills::delete_skill_handler))
            .route(
                routes::MENTORSHIPS_ID,
                delete(mentorships::delete_mentorship_handler),
            )
            .route(routes::REVIEWS_ID, delete(reviews::delete_review_handler)),
    );

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(mentor)
        .merge(learner)
        .merge(any_role)
        .merge(learner_or_admin)
        .merge(admin)
        .fallback(root::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
