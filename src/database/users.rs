// ABOUTME: User management database operations
// ABOUTME: Handles user registration, profile lookup, updates, and account deletion

use std::str::FromStr;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{ExperienceLevel, User};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;

/// Profile fields a user may update after registration
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    /// New age in years
    pub age: Option<i64>,
    /// New body weight in kilograms
    pub weight_kg: Option<f64>,
    /// New experience level
    pub experience_level: Option<ExperienceLevel>,
}

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                age INTEGER,
                weight_kg REAL,
                experience_level TEXT
                    CHECK (experience_level IN ('beginner', 'intermediate', 'advanced')),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a new user, returning its id
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the username is taken.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        age: Option<i64>,
        weight_kg: Option<f64>,
        experience_level: Option<ExperienceLevel>,
    ) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO users (username, password_hash, age, weight_kg, experience_level)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(username)
        .bind(password_hash)
        .bind(age)
        .bind(weight_kg)
        .bind(experience_level.map(|level| level.as_str()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                AppError::already_exists(format!("Username already registered: {username}")),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by id
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such user exists.
    pub async fn get_user_by_id(&self, user_id: i64) -> AppResult<User> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map_or_else(
            || Err(AppError::not_found("User")),
            |row| row_to_user(&row),
        )
    }

    /// Look up a user by username, returning `None` if absent
    ///
    /// # Errors
    ///
    /// Returns an error if the query or row decoding fails.
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    /// Apply a partial profile update, leaving absent fields unchanged
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such user exists.
    pub async fn update_user_profile(
        &self,
        user_id: i64,
        update: &UserProfileUpdate,
    ) -> AppResult<User> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                age = COALESCE(?, age),
                weight_kg = COALESCE(?, weight_kg),
                experience_level = COALESCE(?, experience_level),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            ",
        )
        .bind(update.age)
        .bind(update.weight_kg)
        .bind(update.experience_level.map(|level| level.as_str()))
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }
        self.get_user_by_id(user_id).await
    }

    /// Delete a user and all dependent rows (cascade via foreign keys)
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such user exists.
    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }
}

pub(super) fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> AppResult<User> {
    let experience_level: Option<String> = row.try_get("experience_level")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        age: row.try_get("age")?,
        weight_kg: row.try_get("weight_kg")?,
        experience_level: experience_level
            .as_deref()
            .map(ExperienceLevel::from_str)
            .transpose()?,
        created_at,
        updated_at,
    })
}
