//! User profile handlers

use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::UserProfile;

/// Get a user's public profile
/// GET /api/v1/users/{user_id}
pub async fn get_user(pool: web::Data<PgPool>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let user = user_repo::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}
