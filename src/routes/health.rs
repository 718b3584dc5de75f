// ABOUTME: Health check endpoint for liveness probes
// ABOUTME: Public, unauthenticated, reports service name and version

//! Health check routes

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

/// Public liveness probe
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    #[must_use]
    pub fn routes() -> Router {
        Router::new().route("/health", get(Self::handle_health))
    }

    async fn handle_health() -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            })),
        )
    }
}
