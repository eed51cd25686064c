//! Timed status effects on actors (poisoned, blessed, burning).

use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::status::{ActorStatus, ApplyStatus, ExpiredStatus};

const COLUMNS: &str = "actor_id, status_id, turns_left, stacks, intensity, source_id, created_at";

pub struct StatusRepo;

impl StatusRepo {
    /// Apply a status, refreshing it if the actor already has it. A refresh
    /// overwrites duration, stacks and intensity but keeps the original
    /// source when the new application carries none.
    pub async fn apply(pool: &PgPool, input: &ApplyStatus) -> StoreResult<ActorStatus> {
        let query = format!(
            "INSERT INTO actor_statuses (actor_id, status_id, turns_left, stacks, intensity, source_id)
             VALUES ($1, $2, COALESCE($3, 1), COALESCE($4, 1), COALESCE($5, 1.0), $6)
             ON CONFLICT (actor_id, status_id) DO UPDATE SET
                turns_left = EXCLUDED.turns_left,
                stacks     = EXCLUDED.stacks,
                intensity  = EXCLUDED.intensity,
                source_id  = COALESCE(EXCLUDED.source_id, actor_statuses.source_id)
             RETURNING {COLUMNS}"
        );
        let status = sqlx::query_as::<_, ActorStatus>(&query)
            .bind(&input.actor_id)
            .bind(&input.status_id)
            .bind(input.turns_left)
            .bind(input.stacks)
            .bind(input.intensity)
            .bind(&input.source_id)
            .fetch_one(pool)
            .await?;
        Ok(status)
    }

    pub async fn find(
        pool: &PgPool,
        actor_id: &str,
        status_id: &str,
    ) -> StoreResult<Option<ActorStatus>> {
        let query = format!(
            "SELECT {COLUMNS} FROM actor_statuses WHERE actor_id = $1 AND status_id = $2"
        );
        let status = sqlx::query_as::<_, ActorStatus>(&query)
            .bind(actor_id)
            .bind(status_id)
            .fetch_optional(pool)
            .await?;
        Ok(status)
    }

    /// Statuses still ticking on the actor, oldest first.
    pub async fn list_active(pool: &PgPool, actor_id: &str) -> StoreResult<Vec<ActorStatus>> {
        let query = format!(
            "SELECT {COLUMNS} FROM actor_statuses
             WHERE actor_id = $1 AND turns_left > 0
             ORDER BY created_at"
        );
        let statuses = sqlx::query_as::<_, ActorStatus>(&query)
            .bind(actor_id)
            .fetch_all(pool)
            .await?;
        Ok(statuses)
    }

    /// Cure or dispel a single status.
    pub async fn remove(pool: &PgPool, actor_id: &str, status_id: &str) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM actor_statuses WHERE actor_id = $1 AND status_id = $2")
                .bind(actor_id)
                .bind(status_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// End-of-turn tick: decrement every remaining duration and purge the
    /// rows that reach zero, reporting which actor/status pairs expired so
    /// the caller can narrate them. One transaction, so a status is never
    /// observed at zero turns.
    pub async fn decay_all(pool: &PgPool) -> StoreResult<Vec<ExpiredStatus>> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE actor_statuses SET turns_left = turns_left - 1 WHERE turns_left > 0")
            .execute(&mut *tx)
            .await?;

        let expired = sqlx::query_as::<_, ExpiredStatus>(
            "DELETE FROM actor_statuses WHERE turns_left <= 0
             RETURNING actor_id, status_id",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(expired)
    }
}
