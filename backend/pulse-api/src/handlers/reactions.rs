//! Reaction handlers - the HTTP boundary of the reaction ledger

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::services::ReactionLedger;

/// Toggle a like on a post
/// POST /api/v1/posts/{post_id}/like
pub async fn like_post(
    ledger: web::Data<ReactionLedger>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let status = ledger.toggle_like(path.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(status))
}

/// Toggle a dislike on a post
/// POST /api/v1/posts/{post_id}/dislike
pub async fn dislike_post(
    ledger: web::Data<ReactionLedger>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let status = ledger.toggle_dislike(path.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(status))
}

/// Read the caller's interaction status for a post
/// GET /api/v1/posts/{post_id}/interaction
pub async fn get_interaction(
    ledger: web::Data<ReactionLedger>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let status = ledger
        .interaction_status(path.into_inner(), user_id.0)
        .await?;
    Ok(HttpResponse::Ok().json(status))
}
