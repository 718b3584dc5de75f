// ABOUTME: VO2max cardio session route handlers
// ABOUTME: Session logging with Cooper auto-estimation, listings, and progression

//! VO2max session routes

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{authenticate, ServerResources};
use crate::database::Vo2maxSessionFilters;
use crate::errors::AppError;
use crate::intelligence::vo2max::SessionMeasurements;
use crate::models::CardioProtocol;

#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    workout_id: i64,
    protocol: String,
    duration_minutes: i64,
    intervals_completed: Option<i64>,
    average_heart_rate: Option<i64>,
    peak_heart_rate: Option<i64>,
    estimated_vo2max: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct SessionQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    protocol: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
struct ProgressionQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// VO2max session routes
pub struct Vo2maxRoutes;

impl Vo2maxRoutes {
    /// Create the VO2max routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/vo2max-sessions", post(Self::handle_create))
            .route("/vo2max-sessions", get(Self::handle_list))
            .route("/vo2max-sessions/progression", get(Self::handle_progression))
            .route("/vo2max-sessions/:id", get(Self::handle_get))
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateSessionRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let protocol = CardioProtocol::from_str(&request.protocol)?;

        let measurements = SessionMeasurements {
            duration_minutes: request.duration_minutes,
            intervals_completed: request.intervals_completed,
            average_heart_rate: request.average_heart_rate,
            peak_heart_rate: request.peak_heart_rate,
            estimated_vo2max: request.estimated_vo2max,
        };
        let session = resources
            .database
            .create_vo2max_session(user_id, request.workout_id, protocol, measurements)
            .await?;
        Ok((StatusCode::CREATED, Json(session)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<SessionQuery>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let filters = Vo2maxSessionFilters {
            start_date: params.start_date,
            end_date: params.end_date,
            protocol: params
                .protocol
                .as_deref()
                .map(CardioProtocol::from_str)
                .transpose()?,
            limit: params.limit,
            offset: params.offset,
        };
        let sessions = resources
            .database
            .list_vo2max_sessions(user_id, &filters)
            .await?;
        Ok((StatusCode::OK, Json(sessions)).into_response())
    }

    async fn handle_progression(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<ProgressionQuery>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let progression = resources
            .database
            .get_vo2max_progression(user_id, params.start_date, params.end_date)
            .await?;
        Ok((StatusCode::OK, Json(progression)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(session_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let session = resources
            .database
            .get_vo2max_session(user_id, session_id)
            .await?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }
}
