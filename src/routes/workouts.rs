// ABOUTME: Workout session and set logging route handlers
// ABOUTME: Session lifecycle plus idempotent set logging with 1RM feedback

//! Workout routes
//!
//! `WorkoutRoutes` manages session lifecycle; `SetRoutes` logs individual
//! sets. A resent set id is deduplicated so flaky mobile connections can
//! retry without double-counting volume.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{authenticate, ServerResources};
use crate::database::NewSet;
use crate::errors::AppError;
use crate::models::WorkoutStatus;

#[derive(Debug, Deserialize)]
struct CreateWorkoutRequest {
    program_day_id: i64,
    date: NaiveDate,
}

#[derive(Debug, Deserialize, Default)]
struct WorkoutQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: String,
}

#[derive(Debug, Deserialize)]
struct LogSetRequest {
    /// Client-assigned id; resending the same id replays the stored set
    id: Option<i64>,
    workout_id: i64,
    exercise_id: i64,
    set_number: Option<i64>,
    weight_kg: f64,
    reps: i64,
    rir: i64,
    timestamp: Option<DateTime<Utc>>,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SetQuery {
    workout_id: i64,
}

/// Workout session routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create the workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/workouts", post(Self::handle_create))
            .route("/workouts", get(Self::handle_list))
            .route("/workouts/:id", get(Self::handle_get))
            .route("/workouts/:id", patch(Self::handle_update_status))
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateWorkoutRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let workout = resources
            .database
            .create_workout(user_id, request.program_day_id, request.date)
            .await?;
        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<WorkoutQuery>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let workouts = resources
            .database
            .list_workouts(user_id, params.start_date, params.end_date)
            .await?;

        // Attach the program day so clients can label sessions without
        // a second round trip
        let mut enriched = Vec::with_capacity(workouts.len());
        for workout in workouts {
            let day = resources
                .database
                .get_program_day(user_id, workout.program_day_id)
                .await?;
            enriched.push(json!({
                "id": workout.id,
                "user_id": workout.user_id,
                "program_day_id": workout.program_day_id,
                "date": workout.date,
                "started_at": workout.started_at,
                "completed_at": workout.completed_at,
                "status": workout.status,
                "total_volume_kg": workout.total_volume_kg,
                "average_rir": workout.average_rir,
                "day_name": day.day_name,
                "day_type": day.day_type,
            }));
        }
        Ok((StatusCode::OK, Json(enriched)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(workout_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let workout = resources.database.get_workout(user_id, workout_id).await?;
        let day = resources
            .database
            .get_program_day(user_id, workout.program_day_id)
            .await?;
        let planned = resources.database.get_program_exercises(day.id).await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "id": workout.id,
                "user_id": workout.user_id,
                "program_day_id": workout.program_day_id,
                "date": workout.date,
                "started_at": workout.started_at,
                "completed_at": workout.completed_at,
                "status": workout.status,
                "total_volume_kg": workout.total_volume_kg,
                "average_rir": workout.average_rir,
                "day_name": day.day_name,
                "day_type": day.day_type,
                "planned_exercises": planned,
            })),
        )
            .into_response())
    }

    async fn handle_update_status(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(workout_id): Path<i64>,
        Json(request): Json<UpdateStatusRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let status = WorkoutStatus::from_str(&request.status)?;
        let workout = resources
            .database
            .update_workout_status(user_id, workout_id, status)
            .await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }
}

/// Set logging routes
pub struct SetRoutes;

impl SetRoutes {
    /// Create the set routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/sets", post(Self::handle_log))
            .route("/sets", get(Self::handle_list))
            .route("/sets/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_log(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<LogSetRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let new_set = NewSet {
            client_id: request.id,
            exercise_id: request.exercise_id,
            set_number: request.set_number,
            weight_kg: request.weight_kg,
            reps: request.reps,
            rir: request.rir,
            timestamp: request.timestamp,
            notes: request.notes,
        };
        let logged = resources
            .database
            .log_set(user_id, request.workout_id, new_set)
            .await?;

        let status = if logged.deduplicated {
            StatusCode::OK
        } else {
            StatusCode::CREATED
        };
        Ok((status, Json(logged)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<SetQuery>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let sets = resources
            .database
            .get_sets_for_workout(user_id, params.workout_id)
            .await?;
        Ok((StatusCode::OK, Json(sets)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(set_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        resources.database.delete_set(user_id, set_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
