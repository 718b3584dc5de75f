// ABOUTME: Training analytics route handlers
// ABOUTME: 1RM progression, weekly volume tracking, history, and consistency

//! Analytics routes

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;

use super::{authenticate, ServerResources};
use crate::constants::analytics_limits;
use crate::errors::AppError;

const DEFAULT_PROGRESSION_DAYS: u64 = 90;
const DEFAULT_TREND_WEEKS: i64 = 8;

#[derive(Debug, Deserialize)]
struct ProgressionQuery {
    exercise_id: i64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct VolumeTrendQuery {
    muscle_group: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    weeks: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
struct VolumeHistoryQuery {
    weeks: Option<i64>,
    muscle_group: Option<String>,
}

/// Analytics routes
pub struct AnalyticsRoutes;

impl AnalyticsRoutes {
    /// Create the analytics routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/analytics/1rm-progression", get(Self::handle_progression))
            .route("/analytics/volume-trends", get(Self::handle_volume_trends))
            .route("/analytics/volume-current-week", get(Self::handle_current_week))
            .route("/analytics/volume-history", get(Self::handle_volume_history))
            .route("/analytics/consistency", get(Self::handle_consistency))
            .route(
                "/analytics/program-volume-analysis",
                get(Self::handle_program_volume),
            )
            .with_state(resources)
    }

    async fn handle_progression(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<ProgressionQuery>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        resources
            .database
            .get_exercise_by_id(params.exercise_id)
            .await?;

        let end_date = params.end_date.unwrap_or_else(|| Utc::now().date_naive());
        let start_date = params
            .start_date
            .unwrap_or(end_date - Days::new(DEFAULT_PROGRESSION_DAYS));
        if start_date > end_date {
            return Err(AppError::invalid_input(
                "start_date must not be after end_date",
            ));
        }

        let progression = resources
            .database
            .get_one_rep_max_progression(user_id, params.exercise_id, start_date, end_date)
            .await?;
        Ok((StatusCode::OK, Json(progression)).into_response())
    }

    async fn handle_volume_trends(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<VolumeTrendQuery>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        validate_muscle_group(&resources, &params.muscle_group)?;
        let weeks = validate_weeks(params.weeks.unwrap_or(DEFAULT_TREND_WEEKS))?;

        let end_date = params.end_date.unwrap_or_else(|| Utc::now().date_naive());
        #[allow(clippy::cast_sign_loss)]
        let start_date = params
            .start_date
            .unwrap_or(end_date - Days::new(weeks as u64 * 7));
        if start_date > end_date {
            return Err(AppError::invalid_input(
                "start_date must not be after end_date",
            ));
        }

        let trends = resources
            .database
            .get_volume_trends(
                user_id,
                &params.muscle_group,
                start_date,
                end_date,
                &resources.fitness,
            )
            .await?;
        Ok((StatusCode::OK, Json(trends)).into_response())
    }

    async fn handle_current_week(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let tracking = resources
            .database
            .get_current_week_volume(user_id, &resources.fitness)
            .await?;
        Ok((StatusCode::OK, Json(tracking)).into_response())
    }

    async fn handle_volume_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<VolumeHistoryQuery>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let weeks = validate_weeks(params.weeks.unwrap_or(DEFAULT_TREND_WEEKS))?;
        if let Some(muscle_group) = &params.muscle_group {
            validate_muscle_group(&resources, muscle_group)?;
        }

        let history = resources
            .database
            .get_volume_history(
                user_id,
                weeks,
                params.muscle_group.as_deref(),
                &resources.fitness,
            )
            .await?;
        Ok((StatusCode::OK, Json(history)).into_response())
    }

    async fn handle_consistency(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let metrics = resources.database.get_consistency_metrics(user_id).await?;
        Ok((StatusCode::OK, Json(metrics)).into_response())
    }

    async fn handle_program_volume(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let analysis = resources
            .database
            .get_program_volume_analysis(user_id, &resources.fitness)
            .await?;
        Ok((StatusCode::OK, Json(analysis)).into_response())
    }
}

fn validate_weeks(weeks: i64) -> Result<i64, AppError> {
    if !(analytics_limits::HISTORY_WEEKS_MIN..=analytics_limits::HISTORY_WEEKS_MAX).contains(&weeks)
    {
        return Err(AppError::out_of_range(format!(
            "Weeks must be between {} and {}",
            analytics_limits::HISTORY_WEEKS_MIN,
            analytics_limits::HISTORY_WEEKS_MAX
        )));
    }
    Ok(weeks)
}

fn validate_muscle_group(
    resources: &Arc<ServerResources>,
    muscle_group: &str,
) -> Result<(), AppError> {
    let known = resources
        .fitness
        .landmarks
        .muscle_groups()
        .any(|group| group == muscle_group);
    if known {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "Unknown muscle group: {muscle_group}"
        )))
    }
}
