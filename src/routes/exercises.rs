// ABOUTME: Exercise catalog route handlers
// ABOUTME: Filtered catalog listing, single lookup, and last-performance history

//! Exercise catalog routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::{authenticate, ServerResources};
use crate::database::ExerciseFilters;
use crate::errors::AppError;

#[derive(Debug, Deserialize, Default)]
struct ExerciseQuery {
    muscle_group: Option<String>,
    equipment: Option<String>,
    movement_pattern: Option<String>,
}

/// Exercise catalog routes
pub struct ExerciseRoutes;

impl ExerciseRoutes {
    /// Create the exercise catalog routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/exercises", get(Self::handle_list))
            .route("/exercises/:id", get(Self::handle_get))
            .route(
                "/exercises/:id/last-performance",
                get(Self::handle_last_performance),
            )
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<ExerciseQuery>,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources)?;

        if let Some(muscle_group) = &params.muscle_group {
            let known = resources
                .fitness
                .landmarks
                .muscle_groups()
                .any(|group| group == muscle_group);
            if !known {
                return Err(AppError::invalid_input(format!(
                    "Unknown muscle group: {muscle_group}"
                )));
            }
        }

        let filters = ExerciseFilters {
            muscle_group: params.muscle_group,
            equipment: params.equipment,
            movement_pattern: params.movement_pattern,
        };
        let exercises = resources.database.get_exercises(&filters).await?;
        Ok((StatusCode::OK, Json(exercises)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(exercise_id): Path<i64>,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources)?;
        let exercise = resources.database.get_exercise_by_id(exercise_id).await?;
        Ok((StatusCode::OK, Json(exercise)).into_response())
    }

    async fn handle_last_performance(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(exercise_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        resources.database.get_exercise_by_id(exercise_id).await?;

        let performance = resources
            .database
            .get_last_performance(user_id, exercise_id)
            .await?;

        match performance {
            Some(performance) => Ok((StatusCode::OK, Json(performance)).into_response()),
            None => Ok((StatusCode::OK, Json(json!(null))).into_response()),
        }
    }
}
