// ABOUTME: Registration and login route handlers
// ABOUTME: Registration seeds the default 6-day program and returns a JWT

//! Authentication routes

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::ServerResources;
use crate::auth::{hash_password, verify_password};
use crate::constants::{user_limits, weight_limits};
use crate::errors::AppError;
use crate::models::{ExperienceLevel, User};

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    username: String,
    password: String,
    age: Option<i64>,
    weight_kg: Option<f64>,
    experience_level: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    user_id: i64,
    username: String,
    token: String,
}

/// Registration and login routes (public)
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create the authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/register", post(Self::handle_register))
            .route("/auth/login", post(Self::handle_login))
            .with_state(resources)
    }

    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        validate_registration(&request)?;

        let experience_level = request
            .experience_level
            .as_deref()
            .map(ExperienceLevel::from_str)
            .transpose()?;

        let password_hash = hash_password(request.password).await?;
        let user_id = resources
            .database
            .create_user(
                &request.username,
                &password_hash,
                request.age,
                request.weight_kg,
                experience_level,
            )
            .await?;

        // Every account starts with the default 6-day split
        resources.database.create_default_program(user_id).await?;

        let user = resources.database.get_user_by_id(user_id).await?;
        let token = resources.auth_manager.generate_token(&user)?;

        info!(user_id, username = %user.username, "Registered new user");

        Ok((
            StatusCode::CREATED,
            Json(AuthResponse {
                user_id,
                username: user.username,
                token,
            }),
        )
            .into_response())
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let user: Option<User> = resources
            .database
            .get_user_by_username(&request.username)
            .await?;

        // Verify against a constant hash when the user is unknown so the
        // response time does not reveal which usernames exist
        let Some(user) = user else {
            let _ = verify_password(
                request.password,
                "$2b$12$mkpTgcX3dKdTc4eTSj9Qv.y3Qj7jcvMhhlL4JVm0BnMh5n4qjTmfa".into(),
            )
            .await;
            return Err(AppError::auth_invalid("Invalid username or password"));
        };

        let valid = verify_password(request.password, user.password_hash.clone()).await?;
        if !valid {
            return Err(AppError::auth_invalid("Invalid username or password"));
        }

        let token = resources.auth_manager.generate_token(&user)?;
        info!(user_id = user.id, username = %user.username, "User logged in");

        Ok((
            StatusCode::OK,
            Json(json!({
                "token": token,
                "user": user,
            })),
        )
            .into_response())
    }
}

fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
    if request.username.len() < user_limits::USERNAME_MIN_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Username must be at least {} characters",
            user_limits::USERNAME_MIN_LENGTH
        )));
    }
    if request.password.len() < user_limits::PASSWORD_MIN_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Password must be at least {} characters",
            user_limits::PASSWORD_MIN_LENGTH
        )));
    }
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
    Ok(())
}
