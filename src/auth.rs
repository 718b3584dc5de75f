// ABOUTME: JWT authentication and password hashing for the FitFlow API
// ABOUTME: Issues and validates HS256 tokens and wraps bcrypt behind blocking-safe helpers

//! Authentication and session management
//!
//! `AuthManager` issues HS256 JWTs carrying the user id and username, and
//! validates incoming bearer tokens with a detailed error taxonomy so routes
//! can distinguish expired from malformed tokens. Password hashing uses
//! bcrypt behind `spawn_blocking` to keep the async runtime responsive.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::constants::auth_limits;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired {
                expired_at,
                current_time,
            } => {
                let expired_for = current_time.signed_duration_since(*expired_at);
                if expired_for.num_minutes() < 60 {
                    write!(
                        f,
                        "JWT token expired {} minutes ago at {}",
                        expired_for.num_minutes(),
                        expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                    )
                } else if expired_for.num_hours() < 48 {
                    write!(
                        f,
                        "JWT token expired {} hours ago at {}",
                        expired_for.num_hours(),
                        expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                    )
                } else {
                    write!(
                        f,
                        "JWT token expired {} days ago at {}",
                        expired_for.num_days(),
                        expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                    )
                }
            }
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(err: JwtValidationError) -> Self {
        match err {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            JwtValidationError::TokenInvalid { .. } | JwtValidationError::TokenMalformed { .. } => {
                Self::auth_invalid(err.to_string())
            }
        }
    }
}

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a decimal string
    pub sub: String,
    /// Username for log context
    pub username: String,
    /// Issued at timestamp (seconds)
    pub iat: i64,
    /// Expiration timestamp (seconds)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject back into a user id
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a decimal integer.
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::auth_invalid(format!("Invalid subject claim: {}", self.sub)))
    }
}

/// Authentication manager for `JWT` tokens and passwords
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager with a symmetric signing secret
    #[must_use]
    pub fn new(jwt_secret: &str, token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_expiry_hours,
        }
    }

    /// Generate an HS256 `JWT` token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate an HS256 `JWT` token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token has expired, carries an
    /// invalid signature, or is not a well-formed JWT.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let validation = Validation::new(Algorithm::HS256);
        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(Self::convert_jwt_error(&e, token)),
        }
    }

    fn convert_jwt_error(e: &jsonwebtoken::errors::Error, token: &str) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => {
                // Recover the expiry for the error message; signature already verified
                let expired_at = decode_expiry_unverified(token).unwrap_or_else(Utc::now);
                JwtValidationError::TokenExpired {
                    expired_at,
                    current_time: Utc::now(),
                }
            }
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token encoding is invalid: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token claims are invalid: {json_err}"),
            },
            ErrorKind::Utf8(utf8_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {utf8_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: e.to_string(),
            },
        }
    }
}

/// Decode the `exp` claim without verifying the signature
fn decode_expiry_unverified(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    let key = DecodingKey::from_secret(&[]);
    let data = decode::<Claims>(token, &key, &validation).ok()?;
    DateTime::from_timestamp(data.claims.exp, 0)
}

/// Extract a bearer token from an `Authorization` header value
///
/// # Errors
///
/// Returns an error if the header does not use the `Bearer` scheme.
pub fn extract_bearer_token(header_value: &str) -> AppResult<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::auth_invalid("Authorization header must use the Bearer scheme"))
}

/// Hash a password with bcrypt on the blocking thread pool
///
/// # Errors
///
/// Returns an error if hashing fails or the blocking task is cancelled.
pub async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, auth_limits::BCRYPT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against a bcrypt hash on the blocking thread pool
///
/// # Errors
///
/// Returns an error if verification fails to run or the blocking task is
/// cancelled. A wrong password returns `Ok(false)`, not an error.
pub async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExperienceLevel;

    fn test_user() -> User {
        User {
            id: 42,
            username: "lifter".into(),
            password_hash: String::new(),
            age: Some(28),
            weight_kg: Some(82.5),
            experience_level: Some(ExperienceLevel::Intermediate),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let manager = AuthManager::new("test-secret", 720);
        let token = manager.generate_token(&test_user()).unwrap();
        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "lifter");
        assert_eq!(claims.user_id().unwrap(), 42);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = AuthManager::new("test-secret", 720);
        let token = manager.generate_token(&test_user()).unwrap();

        let other = AuthManager::new("other-secret", 720);
        let err = other.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenInvalid { .. }));
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = AuthManager::new("test-secret", -1);
        let token = manager.generate_token(&test_user()).unwrap();
        let err = manager.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenExpired { .. }));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let manager = AuthManager::new("test-secret", 720);
        let err = manager.validate_token("not-a-jwt").unwrap_err();
        assert!(matches!(
            err,
            JwtValidationError::TokenMalformed { .. } | JwtValidationError::TokenInvalid { .. }
        ));
    }

    #[test]
    fn test_bearer_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_bearer_token("Basic abc").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
    }

    #[tokio::test]
    async fn test_password_hash_and_verify() {
        let hash = hash_password("correct horse battery".into()).await.unwrap();
        assert!(verify_password("correct horse battery".into(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong".into(), hash).await.unwrap());
    }
}
