use crate::error::AppError;
use crate::models::{FeedPost, Post};
use sqlx::PgPool;
use uuid::Uuid;

/// One projection serves the feed, a single post, and per-author listings:
/// post + author join, reaction counts aggregated from the membership rows,
/// and the viewer's own standing folded in via BOOL_OR. Because counts and
/// flags come from the same statement they reflect one snapshot.
const FEED_SELECT: &str = r#"
    SELECT p.id,
           p.content,
           p.created_at,
           u.id AS author_id,
           u.name AS author_name,
           u.email AS author_email,
           COUNT(r.user_id) FILTER (WHERE r.reaction = 'like') AS like_count,
           COUNT(r.user_id) FILTER (WHERE r.reaction = 'dislike') AS dislike_count,
           COALESCE(BOOL_OR(r.user_id = $1 AND r.reaction = 'like'), false) AS has_liked,
           COALESCE(BOOL_OR(r.user_id = $1 AND r.reaction = 'dislike'), false) AS has_disliked
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN post_reactions r ON r.post_id = p.id
"#;

/// Create a new post
pub async fn create_post(pool: &PgPool, author_id: Uuid, content: &str) -> Result<Post, AppError> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, content)
        VALUES ($1, $2)
        RETURNING id, author_id, content, created_at
        "#,
    )
    .bind(author_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Get one post as a feed entry for the given viewer
pub async fn get_feed_post(
    pool: &PgPool,
    post_id: Uuid,
    viewer_id: Uuid,
) -> Result<Option<FeedPost>, AppError> {
    let sql = format!(
        "{FEED_SELECT}
        WHERE p.id = $2
        GROUP BY p.id, p.content, p.created_at, u.id, u.name, u.email"
    );

    let post = sqlx::query_as::<_, FeedPost>(&sql)
        .bind(viewer_id)
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

    Ok(post)
}

/// Global feed, newest first
pub async fn list_feed(
    pool: &PgPool,
    viewer_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FeedPost>, AppError> {
    let sql = format!(
        "{FEED_SELECT}
        GROUP BY p.id, p.content, p.created_at, u.id, u.name, u.email
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3"
    );

    let posts = sqlx::query_as::<_, FeedPost>(&sql)
        .bind(viewer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(posts)
}

/// Posts by one author, newest first
pub async fn list_user_posts(
    pool: &PgPool,
    author_id: Uuid,
    viewer_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FeedPost>, AppError> {
    let sql = format!(
        "{FEED_SELECT}
        WHERE p.author_id = $2
        GROUP BY p.id, p.content, p.created_at, u.id, u.name, u.email
        ORDER BY p.created_at DESC
        LIMIT $3 OFFSET $4"
    );

    let posts = sqlx::query_as::<_, FeedPost>(&sql)
        .bind(viewer_id)
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(posts)
}

/// Check whether a post exists
pub async fn post_exists(pool: &PgPool, post_id: Uuid) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}
