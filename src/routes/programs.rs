// ABOUTME: Training program and program-exercise route handlers
// ABOUTME: Active program view, phase advancement, planned volume, and slot editing

//! Program routes
//!
//! `ProgramRoutes` serves the active program and its phase/volume operations;
//! `ProgramExerciseRoutes` edits the planned exercise slots, reporting a
//! volume warning whenever a change pushes a muscle group out of range.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::{authenticate, ServerResources};
use crate::errors::AppError;
use crate::models::{MesocyclePhase, ProgramExercise};

#[derive(Debug, Deserialize)]
struct AdvancePhaseRequest {
    /// True when the caller picks the target phase instead of cycling
    #[serde(default)]
    manual: bool,
    target_phase: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProgramExerciseQuery {
    program_day_id: i64,
}

#[derive(Debug, Deserialize)]
struct CreateProgramExerciseRequest {
    program_day_id: i64,
    exercise_id: i64,
    sets: i64,
    rep_range: String,
    rir: i64,
}

#[derive(Debug, Deserialize)]
struct UpdateProgramExerciseRequest {
    sets: Option<i64>,
    rep_range: Option<String>,
    rir: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SwapExerciseRequest {
    new_exercise_id: i64,
}

#[derive(Debug, Deserialize)]
struct ReorderItem {
    program_exercise_id: i64,
    new_order_index: i64,
}

#[derive(Debug, Deserialize)]
struct ReorderRequest {
    program_day_id: i64,
    order: Vec<ReorderItem>,
}

/// Program-level routes
pub struct ProgramRoutes;

impl ProgramRoutes {
    /// Create the program routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/programs", get(Self::handle_get_active))
            .route("/programs/:id/advance-phase", patch(Self::handle_advance_phase))
            .route("/programs/:id/volume", get(Self::handle_volume))
            .with_state(resources)
    }

    async fn handle_get_active(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let program = resources.database.get_active_program(user_id).await?;
        let days = resources.database.get_program_days(program.id).await?;

        let mut days_with_exercises = Vec::with_capacity(days.len());
        for day in days {
            let exercises = resources.database.get_program_exercises(day.id).await?;
            days_with_exercises.push(json!({
                "id": day.id,
                "program_id": day.program_id,
                "day_of_week": day.day_of_week,
                "day_name": day.day_name,
                "day_type": day.day_type,
                "exercises": exercises,
            }));
        }

        Ok((
            StatusCode::OK,
            Json(json!({
                "id": program.id,
                "user_id": program.user_id,
                "name": program.name,
                "created_at": program.created_at,
                "mesocycle_week": program.mesocycle_week,
                "mesocycle_length_weeks": program.mesocycle_length_weeks,
                "mesocycle_phase": program.mesocycle_phase,
                "program_days": days_with_exercises,
            })),
        )
            .into_response())
    }

    async fn handle_advance_phase(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(program_id): Path<i64>,
        Json(request): Json<AdvancePhaseRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let manual_target = if request.manual {
            let target = request.target_phase.as_deref().ok_or_else(|| {
                AppError::invalid_input("target_phase is required for a manual transition")
            })?;
            Some(MesocyclePhase::from_str(target)?)
        } else {
            None
        };

        let advancement = resources
            .database
            .advance_program_phase(user_id, program_id, manual_target, &resources.fitness)
            .await?;
        Ok((StatusCode::OK, Json(advancement)).into_response())
    }

    async fn handle_volume(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(program_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        // Ownership check before analyzing
        resources.database.get_program(user_id, program_id).await?;

        let analysis = resources
            .database
            .get_program_volume_analysis(user_id, &resources.fitness)
            .await?;
        Ok((StatusCode::OK, Json(analysis)).into_response())
    }
}

/// Planned exercise slot routes
pub struct ProgramExerciseRoutes;

impl ProgramExerciseRoutes {
    /// Create the program exercise routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/program-exercises", get(Self::handle_list))
            .route("/program-exercises", post(Self::handle_create))
            .route("/program-exercises/reorder", patch(Self::handle_reorder))
            .route("/program-exercises/:id", patch(Self::handle_update))
            .route("/program-exercises/:id", delete(Self::handle_delete))
            .route("/program-exercises/:id/swap", put(Self::handle_swap))
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<ProgramExerciseQuery>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        resources
            .database
            .get_program_day(user_id, params.program_day_id)
            .await?;

        let exercises = resources
            .database
            .get_program_exercises(params.program_day_id)
            .await?;
        Ok((StatusCode::OK, Json(exercises)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateProgramExerciseRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let created = resources
            .database
            .create_program_exercise(
                user_id,
                request.program_day_id,
                request.exercise_id,
                request.sets,
                &request.rep_range,
                request.rir,
            )
            .await?;

        let volume_warning = volume_warning_for(&resources, user_id, &created).await?;
        Ok((
            StatusCode::CREATED,
            Json(json!({
                "program_exercise": created,
                "volume_warning": volume_warning,
            })),
        )
            .into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(program_exercise_id): Path<i64>,
        Json(request): Json<UpdateProgramExerciseRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let updated = resources
            .database
            .update_program_exercise(
                user_id,
                program_exercise_id,
                request.sets,
                request.rep_range.as_deref(),
                request.rir,
            )
            .await?;

        let volume_warning = volume_warning_for(&resources, user_id, &updated).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "program_exercise": updated,
                "volume_warning": volume_warning,
            })),
        )
            .into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(program_exercise_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        resources
            .database
            .delete_program_exercise(user_id, program_exercise_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_swap(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(program_exercise_id): Path<i64>,
        Json(request): Json<SwapExerciseRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let swapped = resources
            .database
            .swap_program_exercise(user_id, program_exercise_id, request.new_exercise_id)
            .await?;
        Ok((StatusCode::OK, Json(swapped)).into_response())
    }

    async fn handle_reorder(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<ReorderRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let order: Vec<(i64, i64)> = request
            .order
            .iter()
            .map(|item| (item.program_exercise_id, item.new_order_index))
            .collect();
        resources
            .database
            .reorder_program_exercises(user_id, request.program_day_id, &order)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

/// Warning for the changed slot's primary muscle group, if its planned
/// weekly volume now sits outside the landmarks
async fn volume_warning_for(
    resources: &Arc<ServerResources>,
    user_id: i64,
    slot: &ProgramExercise,
) -> Result<Option<String>, AppError> {
    let exercise = resources
        .database
        .get_exercise_by_id(slot.exercise_id)
        .await?;
    let analysis = resources
        .database
        .get_program_volume_analysis(user_id, &resources.fitness)
        .await?;

    Ok(analysis
        .muscle_groups
        .into_iter()
        .find(|group| group.muscle_group == exercise.primary_muscle_group)
        .and_then(|group| group.warning))
}
