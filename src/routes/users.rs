// ABOUTME: User profile route handlers
// ABOUTME: Profile lookup and update plus own-account deletion

//! User profile routes

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::{authenticate, ServerResources};
use crate::constants::{user_limits, weight_limits};
use crate::database::UserProfileUpdate;
use crate::errors::AppError;
use crate::models::ExperienceLevel;

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    age: Option<i64>,
    weight_kg: Option<f64>,
    experience_level: Option<String>,
}

/// User profile routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create the user profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/users/me", get(Self::handle_me))
            .route("/users/me", patch(Self::handle_update_profile))
            .route("/users/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let user = resources.database.get_user_by_id(user_id).await?;
        Ok((StatusCode::OK, Json(user)).into_response())
    }

    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<UpdateProfileRequest>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        if let Some(age) = request.age {
            if !(user_limits::AGE_MIN..=user_limits::AGE_MAX).contains(&age) {
                return Err(AppError::out_of_range(format!(
                    "Age must be between {} and {}",
                    user_limits::AGE_MIN,
                    user_limits::AGE_MAX
                )));
            }
        }
        if let Some(weight_kg) = request.weight_kg {
            if !(weight_limits::MIN_KG..=weight_limits::MAX_KG).contains(&weight_kg) {
                return Err(AppError::out_of_range(format!(
                    "Body weight must be between {} and {} kg",
                    weight_limits::MIN_KG,
                    weight_limits::MAX_KG
                )));
            }
        }

        let update = UserProfileUpdate {
            age: request.age,
            weight_kg: request.weight_kg,
            experience_level: request
                .experience_level
                .as_deref()
                .map(ExperienceLevel::from_str)
                .transpose()?,
        };

        let user = resources
            .database
            .update_user_profile(user_id, &update)
            .await?;
        Ok((StatusCode::OK, Json(user)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(target_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        // Accounts can only delete themselves; other ids read as missing
        if target_id != user_id {
            return Err(AppError::not_found("User"));
        }

        resources.database.delete_user(user_id).await?;
        info!(user_id, "Deleted user account");
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
