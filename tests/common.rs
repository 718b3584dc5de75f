// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, program, and user creation helpers
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

//! Shared test utilities for `fitflow_server`
//!
//! Common setup functions to reduce duplication across integration tests.

use std::sync::Once;

use anyhow::Result;
use fitflow_server::database::Database;
use fitflow_server::models::{DayType, ExperienceLevel, Program, ProgramDay, ProgramExerciseDetail};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory database with migrations and the seeded catalog
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Database::new("sqlite::memory:").await
}

/// Create a user with a plausible profile; the hash is never verified here
pub async fn create_test_user(database: &Database, username: &str) -> Result<i64> {
    let user_id = database
        .create_user(
            username,
            "$2b$12$abcdefghijklmnopqrstuvwxyz0123456789abcdefghijklmnopq",
            Some(30),
            Some(80.0),
            Some(ExperienceLevel::Intermediate),
        )
        .await?;
    Ok(user_id)
}

/// Create a user together with the seeded default program
pub async fn create_user_with_program(database: &Database, username: &str) -> Result<(i64, Program)> {
    let user_id = create_test_user(database, username).await?;
    database.create_default_program(user_id).await?;
    let program = database.get_active_program(user_id).await?;
    Ok((user_id, program))
}

/// First strength day of the program
pub async fn first_strength_day(database: &Database, program_id: i64) -> Result<ProgramDay> {
    let days = database.get_program_days(program_id).await?;
    days.into_iter()
        .find(|day| day.day_type == DayType::Strength)
        .ok_or_else(|| anyhow::anyhow!("Program has no strength day"))
}

/// Look up a planned slot by exercise name within a day
pub async fn find_slot(
    database: &Database,
    program_day_id: i64,
    exercise_name: &str,
) -> Result<ProgramExerciseDetail> {
    let slots = database.get_program_exercises(program_day_id).await?;
    slots
        .into_iter()
        .find(|slot| slot.exercise_name == exercise_name)
        .ok_or_else(|| anyhow::anyhow!("No slot for {exercise_name}"))
}
