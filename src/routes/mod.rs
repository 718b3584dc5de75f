// ABOUTME: HTTP route handlers and shared server state for the FitFlow API
// ABOUTME: Assembles per-domain routers behind tracing, CORS, and timeout layers

//! # HTTP Routes
//!
//! One module per API domain, each exposing a `*Routes` struct whose
//! `routes()` builds an axum `Router` over the shared [`ServerResources`].
//! Handlers authenticate requests themselves via the bearer-token helper;
//! only registration, login, and the health probe are public.

pub mod analytics;
pub mod auth;
pub mod body_weight;
pub mod exercises;
pub mod health;
pub mod programs;
pub mod recovery;
pub mod users;
pub mod vo2max;
pub mod workouts;

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{extract_bearer_token, AuthManager};
use crate::config::environment::ServerConfig;
use crate::config::fitness::FitnessPolicy;
use crate::database::Database;
use crate::errors::{AppError, AppResult};

/// Shared state for all route handlers
pub struct ServerResources {
    /// SQLite-backed store
    pub database: Database,
    /// JWT issuing and validation
    pub auth_manager: AuthManager,
    /// Deployment configuration
    pub config: ServerConfig,
    /// Training methodology policy tables
    pub fitness: FitnessPolicy,
}

impl ServerResources {
    /// Bundle the shared server state
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: ServerConfig) -> Self {
        Self {
            database,
            auth_manager,
            config,
            fitness: FitnessPolicy::default(),
        }
    }
}

/// Authenticate a request and return the caller's user id
///
/// # Errors
///
/// Returns an authentication error when the header is missing, malformed,
/// expired, or carries an invalid signature.
pub(crate) fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> AppResult<i64> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(AppError::auth_required)?;

    let token = extract_bearer_token(auth_header)?;
    let claims = resources.auth_manager.validate_token(token)?;
    claims.user_id()
}

/// Assemble the full API router with its middleware stack
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes())
        .nest(
            "/api",
            Router::new()
                .merge(auth::AuthRoutes::routes(resources.clone()))
                .merge(users::UserRoutes::routes(resources.clone()))
                .merge(exercises::ExerciseRoutes::routes(resources.clone()))
                .merge(programs::ProgramRoutes::routes(resources.clone()))
                .merge(programs::ProgramExerciseRoutes::routes(resources.clone()))
                .merge(workouts::WorkoutRoutes::routes(resources.clone()))
                .merge(workouts::SetRoutes::routes(resources.clone()))
                .merge(recovery::RecoveryRoutes::routes(resources.clone()))
                .merge(vo2max::Vo2maxRoutes::routes(resources.clone()))
                .merge(analytics::AnalyticsRoutes::routes(resources.clone()))
                .merge(body_weight::BodyWeightRoutes::routes(resources)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}
