//! Reaction ledger integration tests against a live PostgreSQL.
//!
//! These verify the ledger's consistency contract end to end: count and
//! membership agreement, toggle involution, atomic cross-toggles, and the
//! absence of lost updates under concurrent toggling.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test -- --ignored`

use futures::future::join_all;
use pulse_api::db::{post_repo, user_repo};
use pulse_api::error::AppError;
use pulse_api::services::ReactionLedger;
use sqlx::PgPool;
use uuid::Uuid;

async fn setup_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for reaction ledger tests");
    let pool = PgPool::connect(&url).await.expect("database connection");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

async fn create_user(pool: &PgPool) -> Uuid {
    let email = format!("{}@example.com", Uuid::new_v4());
    user_repo::create_user(pool, "Test User", &email, "unused-hash", "")
        .await
        .expect("user creation")
        .id
}

async fn create_post(pool: &PgPool, author: Uuid) -> Uuid {
    post_repo::create_post(pool, author, "hello world")
        .await
        .expect("post creation")
        .id
}

async fn stored_reaction_count(pool: &PgPool, post_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM post_reactions WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
        .expect("count query")
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn dislike_then_like_moves_atomically() {
    let pool = setup_pool().await;
    let ledger = ReactionLedger::new(pool.clone(), 3);

    let alice = create_user(&pool).await;
    let bob = create_user(&pool).await;
    let post = create_post(&pool, bob).await;

    let status = ledger.toggle_dislike(post, alice).await.expect("dislike");
    assert_eq!(status.like_count, 0);
    assert_eq!(status.dislike_count, 1);
    assert!(!status.has_liked);
    assert!(status.has_disliked);

    // Cross-toggle: the dislike is removed and the like added in one step.
    let status = ledger.toggle_like(post, alice).await.expect("like");
    assert_eq!(status.like_count, 1);
    assert_eq!(status.dislike_count, 0);
    assert!(status.has_liked);
    assert!(!status.has_disliked);

    let status = ledger.toggle_like(post, bob).await.expect("second like");
    assert_eq!(status.like_count, 2);
    assert_eq!(status.dislike_count, 0);

    // Count/membership agreement: counts equal stored rows.
    assert_eq!(stored_reaction_count(&pool, post).await, 2);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn toggling_twice_returns_to_the_starting_state() {
    let pool = setup_pool().await;
    let ledger = ReactionLedger::new(pool.clone(), 3);

    let user = create_user(&pool).await;
    let post = create_post(&pool, user).await;

    let before = ledger
        .interaction_status(post, user)
        .await
        .expect("status");

    ledger.toggle_like(post, user).await.expect("like");
    let after = ledger.toggle_like(post, user).await.expect("unlike");

    assert_eq!(after.like_count, before.like_count);
    assert_eq!(after.dislike_count, before.dislike_count);
    assert!(!after.has_liked);
    assert!(!after.has_disliked);
    assert_eq!(stored_reaction_count(&pool, post).await, 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn unknown_post_is_not_found_and_mutates_nothing() {
    let pool = setup_pool().await;
    let ledger = ReactionLedger::new(pool.clone(), 3);

    let user = create_user(&pool).await;
    let missing = Uuid::new_v4();

    let err = ledger.toggle_like(missing, user).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = ledger.interaction_status(missing, user).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert_eq!(stored_reaction_count(&pool, missing).await, 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn fifty_concurrent_likes_lose_no_updates() {
    let pool = setup_pool().await;
    let ledger = ReactionLedger::new(pool.clone(), 3);

    let author = create_user(&pool).await;
    let post = create_post(&pool, author).await;

    let mut users = Vec::new();
    for _ in 0..50 {
        users.push(create_user(&pool).await);
    }

    let tasks = users.into_iter().map(|user| {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.toggle_like(post, user).await })
    });

    for result in join_all(tasks).await {
        result.expect("task join").expect("toggle");
    }

    let status = ledger
        .interaction_status(post, author)
        .await
        .expect("status");
    assert_eq!(status.like_count, 50);
    assert_eq!(status.dislike_count, 0);
    assert_eq!(stored_reaction_count(&pool, post).await, 50);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn feed_flags_follow_the_viewer() {
    let pool = setup_pool().await;
    let ledger = ReactionLedger::new(pool.clone(), 3);

    let alice = create_user(&pool).await;
    let bob = create_user(&pool).await;
    let post = create_post(&pool, bob).await;

    ledger.toggle_like(post, alice).await.expect("like");
    ledger.toggle_dislike(post, bob).await.expect("dislike");

    let alice_view = post_repo::get_feed_post(&pool, post, alice)
        .await
        .expect("query")
        .expect("post visible");
    assert!(alice_view.has_liked);
    assert!(!alice_view.has_disliked);
    assert_eq!(alice_view.like_count, 1);
    assert_eq!(alice_view.dislike_count, 1);

    let bob_view = post_repo::get_feed_post(&pool, post, bob)
        .await
        .expect("query")
        .expect("post visible");
    assert!(!bob_view.has_liked);
    assert!(bob_view.has_disliked);
}
