// ABOUTME: Daily recovery assessment route handlers
// ABOUTME: Scores sleep, soreness, and motivation into a volume adjustment

//! Recovery assessment routes
//!
//! One assessment per day; resubmitting replaces that day's scores and the
//! derived volume adjustment.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::{authenticate, ServerResources};
use crate::errors::AppError;
use crate::intelligence::recovery;

const DEFAULT_LIST_LIMIT: i64 = 30;

#[derive(Debug, Deserialize)]
struct AssessmentRequest {
    date: NaiveDate,
    sleep_quality: i64,
    muscle_soreness: i64,
    motivation: i64,
}

#[derive(Debug, Deserialize, Default)]
struct AssessmentQuery {
    date: Option<NaiveDate>,
    limit: Option<i64>,
}

/// Recovery assessment routes
pub struct RecoveryRoutes;

impl RecoveryRoutes {
    /// Create the recovery routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/recovery-assessments", post(Self::handle_submit))
            .route("/recovery-assessments", get(Self::handle_get))
            .with_state(resources)
    }

    async fn handle_submit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<AssessmentRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let assessment = recovery::assess(
            request.sleep_quality,
            request.muscle_soreness,
            request.motivation,
            &resources.fitness.recovery,
        )?;

        let stored = resources
            .database
            .upsert_recovery_assessment(
                user_id,
                request.date,
                request.sleep_quality,
                request.muscle_soreness,
                request.motivation,
                assessment.total_score,
                assessment.volume_adjustment,
            )
            .await?;
        Ok((StatusCode::CREATED, Json(stored)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<AssessmentQuery>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        if let Some(date) = params.date {
            let assessment = resources
                .database
                .get_recovery_assessment(user_id, date)
                .await?;
            return match assessment {
                Some(assessment) => Ok((StatusCode::OK, Json(assessment)).into_response()),
                None => Ok((StatusCode::OK, Json(json!(null))).into_response()),
            };
        }

        let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 365);
        let assessments = resources
            .database
            .list_recovery_assessments(user_id, limit)
            .await?;
        Ok((StatusCode::OK, Json(assessments)).into_response())
    }
}
