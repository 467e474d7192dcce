//! Data models for pulse-api
//!
//! Database rows (sqlx `FromRow`) and the wire types returned to clients.
//! Wire types use camelCase field names to match the web client.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user, as stored. Never serialized directly; the password
/// hash must not leave the service.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
}

/// Public profile projection of a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            bio: user.bio,
            created_at: user.created_at,
        }
    }
}

/// A post row, as stored.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A feed entry: a post joined with its author and the viewer's reaction
/// standing. Counts are computed from the reaction rows in the same query
/// snapshot, so they always agree with the membership flags.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub like_count: i64,
    pub dislike_count: i64,
    pub has_liked: bool,
    pub has_disliked: bool,
}

/// The reaction ledger's projection for one (post, viewer) pair. Returned
/// by every toggle and by the interaction read endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionStatus {
    pub like_count: i64,
    pub dislike_count: i64,
    pub has_liked: bool,
    pub has_disliked: bool,
}
