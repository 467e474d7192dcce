//! Post handlers - HTTP endpoints for the composer and the polled feed

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(
        length(min = 1, max = 2000),
        custom(function = "not_blank", message = "content must not be blank")
    )]
    pub content: String,
}

/// The stored value is trimmed, so whitespace-only content would otherwise
/// slip past the length check and persist as an empty post.
fn not_blank(content: &str) -> std::result::Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

impl PaginationParams {
    fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}

/// Create a new post
/// POST /api/v1/posts
pub async fn create_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = post_repo::create_post(&pool, user_id.0, req.content.trim()).await?;

    // Return the same projection the feed uses, zero reactions included.
    let feed_post = post_repo::get_feed_post(&pool, post.id, user_id.0)
        .await?
        .ok_or_else(|| AppError::Internal("Created post not visible".to_string()))?;

    Ok(HttpResponse::Created().json(feed_post))
}

/// Global feed, newest first
/// GET /api/v1/posts
pub async fn get_feed(
    pool: web::Data<PgPool>,
    user_id: UserId,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.clamped();
    let posts = post_repo::list_feed(&pool, user_id.0, limit, offset).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Posts authored by one user
/// GET /api/v1/users/{user_id}/posts
pub async fn get_user_posts(
    pool: web::Data<PgPool>,
    viewer: UserId,
    path: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let author_id = path.into_inner();
    let (limit, offset) = query.clamped();
    let posts = post_repo::list_user_posts(&pool, author_id, viewer.0, limit, offset).await?;

    Ok(HttpResponse::Ok().json(posts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_is_rejected() {
        let req = CreatePostRequest {
            content: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn whitespace_only_content_is_rejected() {
        let req = CreatePostRequest {
            content: "   \n\t  ".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn oversized_content_is_rejected() {
        let req = CreatePostRequest {
            content: "x".repeat(2001),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn pagination_is_clamped() {
        let params = PaginationParams {
            limit: 10_000,
            offset: -5,
        };
        assert_eq!(params.clamped(), (100, 0));
    }
}
