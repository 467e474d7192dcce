//! Authentication handlers

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::config::Config;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::UserProfile;
use crate::security::{jwt, password};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Register and login response with token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Register endpoint handler
/// POST /api/v1/auth/register
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let password_hash = password::hash_password(&payload.password)?;
    let bio = payload.bio.as_deref().unwrap_or("");

    let user =
        user_repo::create_user(&pool, &payload.name, &payload.email, &password_hash, bio).await?;

    let token = jwt::issue_token(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
        user.id,
        &user.email,
    )?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Login endpoint handler
/// POST /api/v1/auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    // Same error for unknown email and wrong password.
    let user = user_repo::find_by_email(&pool, &payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = jwt::issue_token(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
        user.id,
        &user.email,
    )?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_rejects_bad_email() {
        let req = RegisterRequest {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            password: "long enough password".to_string(),
            bio: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_request_rejects_short_password() {
        let req = RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
            bio: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_request_accepts_valid_payload() {
        let req = RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "long enough password".to_string(),
            bio: Some("Engineer".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn login_request_requires_password() {
        let req = LoginRequest {
            email: "ada@example.com".to_string(),
            password: "".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
