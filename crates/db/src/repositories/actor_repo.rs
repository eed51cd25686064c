//! Repository for the `actors` table.

use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::actor::{Actor, CreateActor, UpdateActor};

const COLUMNS: &str =
    "id, node_id, kind, archetype, x, y, hp, mood, trust, level, skill_points, meta, created_at";

/// Provides CRUD operations for actors.
pub struct ActorRepo;

impl ActorRepo {
    /// Insert a new actor, returning the created row.
    ///
    /// Defaults: hp 100, mood `neutral`, trust 50, level 1, position (0, 0).
    /// A `node_id` that does not resolve is a referential violation.
    pub async fn create(pool: &PgPool, input: &CreateActor) -> StoreResult<Actor> {
        let query = format!(
            "INSERT INTO actors
                (id, kind, node_id, archetype, x, y, hp, mood, trust, level, skill_points, meta)
             VALUES ($1, $2, $3, $4,
                     COALESCE($5, 0), COALESCE($6, 0), COALESCE($7, 100),
                     COALESCE($8, 'neutral'), COALESCE($9, 50), COALESCE($10, 1),
                     COALESCE($11, 0), COALESCE($12, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        let actor = sqlx::query_as::<_, Actor>(&query)
            .bind(&input.id)
            .bind(&input.kind)
            .bind(&input.node_id)
            .bind(&input.archetype)
            .bind(input.x)
            .bind(input.y)
            .bind(input.hp)
            .bind(&input.mood)
            .bind(input.trust)
            .bind(input.level)
            .bind(input.skill_points)
            .bind(&input.meta)
            .fetch_one(pool)
            .await?;
        Ok(actor)
    }

    pub async fn find(pool: &PgPool, id: &str) -> StoreResult<Option<Actor>> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE id = $1");
        let actor = sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(actor)
    }

    pub async fn list_by_node(pool: &PgPool, node_id: &str) -> StoreResult<Vec<Actor>> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE node_id = $1 ORDER BY id");
        let actors = sqlx::query_as::<_, Actor>(&query)
            .bind(node_id)
            .fetch_all(pool)
            .await?;
        Ok(actors)
    }

    /// Update an actor. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateActor,
    ) -> StoreResult<Option<Actor>> {
        let query = format!(
            "UPDATE actors SET
                x = COALESCE($2, x),
                y = COALESCE($3, y),
                hp = COALESCE($4, hp),
                mood = COALESCE($5, mood),
                trust = COALESCE($6, trust),
                level = COALESCE($7, level),
                skill_points = COALESCE($8, skill_points),
                meta = COALESCE($9, meta)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let actor = sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .bind(input.x)
            .bind(input.y)
            .bind(input.hp)
            .bind(&input.mood)
            .bind(input.trust)
            .bind(input.level)
            .bind(input.skill_points)
            .bind(&input.meta)
            .fetch_optional(pool)
            .await?;
        Ok(actor)
    }

    /// Move an actor to a node (or nowhere with `None`). Returns `true` if a
    /// row was updated.
    pub async fn move_to_node(
        pool: &PgPool,
        id: &str,
        node_id: Option<&str>,
    ) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE actors SET node_id = $2 WHERE id = $1")
            .bind(id)
            .bind(node_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an actor. Inventory, statuses, skill grants, and memories
    /// cascade; items the actor owned keep their rows with `owner_id` nulled.
    pub async fn delete(pool: &PgPool, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
