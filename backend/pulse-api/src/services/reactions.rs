//! The reaction ledger: owns all like/dislike mutations.
//!
//! Every toggle runs as one transaction: lock the post row, read the
//! caller's current reaction, apply the state machine, write the new
//! membership, and tally counts from the membership rows before commit.
//! Counts are never stored as independent integers, so they cannot drift
//! from the sets they describe, and the row lock serializes concurrent
//! toggles per post without blocking other posts.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{post_repo, reaction_repo};
use crate::domain::{ReactionKind, ReactionState};
use crate::error::AppError;
use crate::metrics;
use crate::models::InteractionStatus;

#[derive(Clone)]
pub struct ReactionLedger {
    pool: PgPool,
    max_attempts: u32,
}

/// Internal outcome classification for one toggle attempt.
enum ToggleError {
    NotFound,
    /// Serialization failure or deadlock; the transaction can be re-run.
    Conflict(sqlx::Error),
    Db(sqlx::Error),
}

impl From<sqlx::Error> for ToggleError {
    fn from(err: sqlx::Error) -> Self {
        if is_conflict(&err) {
            ToggleError::Conflict(err)
        } else {
            ToggleError::Db(err)
        }
    }
}

/// PostgreSQL serialization_failure / deadlock_detected.
fn is_conflict(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "40001" || code == "40P01")
        .unwrap_or(false)
}

/// Run one toggle to completion, re-running the attempt after a storage
/// conflict up to `max_attempts` times. Conflicts beyond the budget surface
/// as a transient failure; nothing else is ever retried.
async fn retry_toggle<F, Fut>(
    max_attempts: u32,
    kind: ReactionKind,
    post_id: Uuid,
    user_id: Uuid,
    mut attempt_fn: F,
) -> Result<InteractionStatus, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<InteractionStatus, ToggleError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match attempt_fn().await {
            Ok(status) => {
                metrics::REACTION_TOGGLES
                    .with_label_values(&[kind.as_str()])
                    .inc();
                return Ok(status);
            }
            Err(ToggleError::NotFound) => {
                return Err(AppError::NotFound("Post not found".to_string()));
            }
            Err(ToggleError::Conflict(err)) if attempt < max_attempts => {
                metrics::REACTION_CONFLICT_RETRIES.inc();
                tracing::warn!(
                    %post_id,
                    %user_id,
                    attempt,
                    error = %err,
                    "Toggle transaction conflicted, retrying from a fresh read"
                );
            }
            Err(ToggleError::Conflict(err)) => {
                metrics::REACTION_CONFLICT_FAILURES.inc();
                tracing::error!(
                    %post_id,
                    %user_id,
                    attempts = attempt,
                    error = %err,
                    "Toggle retry budget exhausted"
                );
                return Err(AppError::Unavailable(
                    "Concurrent update, please retry".to_string(),
                ));
            }
            Err(ToggleError::Db(err)) => {
                return Err(AppError::Database(err.to_string()));
            }
        }
    }
}

impl ReactionLedger {
    pub fn new(pool: PgPool, max_attempts: u32) -> Self {
        Self {
            pool,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Toggle the caller's like on a post.
    pub async fn toggle_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<InteractionStatus, AppError> {
        self.toggle(post_id, user_id, ReactionKind::Like).await
    }

    /// Toggle the caller's dislike on a post.
    pub async fn toggle_dislike(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<InteractionStatus, AppError> {
        self.toggle(post_id, user_id, ReactionKind::Dislike).await
    }

    async fn toggle(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<InteractionStatus, AppError> {
        let ledger = self.clone();
        retry_toggle(self.max_attempts, kind, post_id, user_id, move || {
            let ledger = ledger.clone();
            async move { ledger.try_toggle(post_id, user_id, kind).await }
        })
        .await
    }

    /// One toggle attempt: a single transaction, committed in full or not
    /// at all. A cross-toggle (disliked -> liked) is the same upsert as any
    /// other write, so the remove/add pair can never be split.
    async fn try_toggle(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<InteractionStatus, ToggleError> {
        let mut tx = self.pool.begin().await?;

        if !reaction_repo::lock_post(&mut tx, post_id).await? {
            return Err(ToggleError::NotFound);
        }

        let stored = reaction_repo::find_reaction(&mut tx, post_id, user_id).await?;
        let current = ReactionState::from_stored(stored.as_deref());
        let next = current.toggle(kind);

        match next.as_stored() {
            Some(reaction) => {
                reaction_repo::upsert_reaction(&mut tx, post_id, user_id, reaction).await?
            }
            None => reaction_repo::delete_reaction(&mut tx, post_id, user_id).await?,
        }

        let (like_count, dislike_count, viewer) =
            reaction_repo::tally(&mut tx, post_id, user_id).await?;
        tx.commit().await?;

        let state = ReactionState::from_stored(viewer.as_deref());
        debug_assert_eq!(state, next);

        Ok(InteractionStatus {
            like_count,
            dislike_count,
            has_liked: state.has_liked(),
            has_disliked: state.has_disliked(),
        })
    }

    /// Read-only projection of counts and the caller's standing.
    ///
    /// Counts and membership come from one aggregate statement, so a poll
    /// can never observe a count without its paired membership.
    pub async fn interaction_status(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<InteractionStatus, AppError> {
        if !post_repo::post_exists(&self.pool, post_id).await? {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let (like_count, dislike_count, viewer) =
            reaction_repo::tally_from_pool(&self.pool, post_id, user_id)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        let state = ReactionState::from_stored(viewer.as_deref());

        Ok(InteractionStatus {
            like_count,
            dislike_count,
            has_liked: state.has_liked(),
            has_disliked: state.has_disliked(),
        })
    }
}
