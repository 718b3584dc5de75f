// ABOUTME: Integration tests for authentication and account management
// ABOUTME: Covers password hashing, JWT round trips, profile updates, and deletion

mod common;

use anyhow::Result;
use common::{create_test_database, create_test_user, create_user_with_program};
use fitflow_server::auth::{extract_bearer_token, hash_password, verify_password, AuthManager};
use fitflow_server::database::UserProfileUpdate;
use fitflow_server::models::ExperienceLevel;

#[tokio::test]
async fn test_password_hash_round_trip() -> Result<()> {
    let hash = hash_password("correct horse battery staple".into()).await?;
    assert!(hash.starts_with("$2"));

    assert!(verify_password("correct horse battery staple".into(), hash.clone()).await?);
    assert!(!verify_password("correct horse battery stable".into(), hash).await?);

    Ok(())
}

#[tokio::test]
async fn test_token_round_trip_against_stored_user() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = create_test_user(&database, "token_holder").await?;
    let user = database.get_user_by_id(user_id).await?;

    let auth_manager = AuthManager::new("integration-test-secret", 24);
    let token = auth_manager.generate_token(&user)?;

    let header = format!("Bearer {token}");
    let claims = auth_manager.validate_token(extract_bearer_token(&header)?)?;
    assert_eq!(claims.user_id()?, user_id);
    assert_eq!(claims.username, "token_holder");

    // A different secret must reject the token
    let other_manager = AuthManager::new("some-other-secret", 24);
    assert!(other_manager.validate_token(&token).is_err());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() -> Result<()> {
    let database = create_test_database().await?;
    create_test_user(&database, "taken").await?;

    let result = create_test_user(&database, "taken").await;
    assert!(result.is_err());

    Ok(())
}

#[tokio::test]
async fn test_profile_update_leaves_absent_fields() -> Result<()> {
    let database = create_test_database().await?;
    let user_id = create_test_user(&database, "updater").await?;

    let updated = database
        .update_user_profile(
            user_id,
            &UserProfileUpdate {
                age: Some(31),
                weight_kg: None,
                experience_level: Some(ExperienceLevel::Advanced),
            },
        )
        .await?;

    assert_eq!(updated.age, Some(31));
    assert_eq!(updated.weight_kg, Some(80.0));
    assert_eq!(updated.experience_level, Some(ExperienceLevel::Advanced));

    Ok(())
}

#[tokio::test]
async fn test_account_deletion_cascades() -> Result<()> {
    let database = create_test_database().await?;
    let (user_id, program) = create_user_with_program(&database, "leaver").await?;

    database.delete_user(user_id).await?;

    assert!(database.get_user_by_id(user_id).await.is_err());
    assert!(database.get_program(user_id, program.id).await.is_err());

    Ok(())
}
