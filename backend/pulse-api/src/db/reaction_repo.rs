//! Reaction row access.
//!
//! The mutating functions take `&mut PgConnection` so the ledger can run
//! them inside one transaction; the transaction boundary (and the per-post
//! lock discipline) is owned by `services::reactions`.

use sqlx::PgConnection;
use sqlx::PgPool;
use uuid::Uuid;

/// Lock the post row for the duration of the surrounding transaction.
///
/// Returns false if the post does not exist. Every toggle takes this lock
/// first, which serializes all toggles on one post while leaving toggles
/// on different posts fully concurrent.
pub async fn lock_post(conn: &mut PgConnection, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let locked: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id FROM posts WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(locked.is_some())
}

/// Read the caller's stored reaction on a post, if any.
pub async fn find_reaction(
    conn: &mut PgConnection,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT reaction FROM post_reactions
        WHERE post_id = $1 AND user_id = $2
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
}

/// Write the caller's reaction, replacing any previous one.
pub async fn upsert_reaction(
    conn: &mut PgConnection,
    post_id: Uuid,
    user_id: Uuid,
    reaction: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO post_reactions (post_id, user_id, reaction)
        VALUES ($1, $2, $3)
        ON CONFLICT (post_id, user_id) DO UPDATE
        SET reaction = EXCLUDED.reaction
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(reaction)
    .execute(conn)
    .await?;

    Ok(())
}

/// Remove the caller's reaction row (transition to neutral).
pub async fn delete_reaction(
    conn: &mut PgConnection,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM post_reactions
        WHERE post_id = $1 AND user_id = $2
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Counts plus the viewer's own reaction, from one statement.
///
/// Single-snapshot by construction: both counts and the membership value
/// come from the same aggregate scan, so a reader can never observe a count
/// that disagrees with the membership it was derived from.
pub async fn tally(
    conn: &mut PgConnection,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<(i64, i64, Option<String>), sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT COUNT(*) FILTER (WHERE reaction = 'like') AS like_count,
               COUNT(*) FILTER (WHERE reaction = 'dislike') AS dislike_count,
               MAX(reaction) FILTER (WHERE user_id = $2) AS viewer_reaction
        FROM post_reactions
        WHERE post_id = $1
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_one(conn)
    .await
}

/// Pool-based variant of [`tally`] for the read-only interaction endpoint.
pub async fn tally_from_pool(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<(i64, i64, Option<String>), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    tally(&mut conn, post_id, user_id).await
}
