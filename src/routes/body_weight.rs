// ABOUTME: Body weight log route handlers
// ABOUTME: Daily upsert, history, latest lookup, and change over a period

//! Body weight routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::{authenticate, ServerResources};
use crate::errors::AppError;

const DEFAULT_HISTORY_LIMIT: i64 = 30;
const DEFAULT_CHANGE_DAYS: u64 = 30;

#[derive(Debug, Deserialize)]
struct LogWeightRequest {
    date: NaiveDate,
    weight_kg: f64,
    notes: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct HistoryQuery {
    limit: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
struct ChangeQuery {
    days: Option<u64>,
}

/// Body weight routes
pub struct BodyWeightRoutes;

impl BodyWeightRoutes {
    /// Create the body weight routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/body-weight", post(Self::handle_log))
            .route("/body-weight", get(Self::handle_history))
            .route("/body-weight/latest", get(Self::handle_latest))
            .route("/body-weight/change", get(Self::handle_change))
            .route("/body-weight/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_log(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<LogWeightRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let entry = resources
            .database
            .log_body_weight(
                user_id,
                request.date,
                request.weight_kg,
                request.notes.as_deref(),
            )
            .await?;
        Ok((StatusCode::CREATED, Json(entry)).into_response())
    }

    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<HistoryQuery>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let history = resources
            .database
            .get_body_weight_history(user_id, params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
            .await?;
        Ok((StatusCode::OK, Json(history)).into_response())
    }

    async fn handle_latest(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let latest = resources.database.get_latest_body_weight(user_id).await?;
        match latest {
            Some(entry) => Ok((StatusCode::OK, Json(entry)).into_response()),
            None => Ok((StatusCode::OK, Json(json!(null))).into_response()),
        }
    }

    async fn handle_change(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<ChangeQuery>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let change = resources
            .database
            .get_weight_change(user_id, params.days.unwrap_or(DEFAULT_CHANGE_DAYS))
            .await?;
        match change {
            Some(change) => Ok((StatusCode::OK, Json(change)).into_response()),
            None => Ok((StatusCode::OK, Json(json!(null))).into_response()),
        }
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(entry_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        resources.database.delete_body_weight(user_id, entry_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
