//! Repository for the `nodes` table.

use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::node::{ActorPresence, Node, NodeView, SeedNode};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, biome, width, height, layout, exits, created_at";

/// Provides seeding, views, and deletion for nodes.
pub struct NodeRepo;

impl NodeRepo {
    /// Insert-if-absent, for idempotent world seeding. Existing rows are left
    /// untouched. Returns `true` when a row was created.
    pub async fn seed(pool: &PgPool, input: &SeedNode) -> StoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO nodes (id, title, biome, width, height, layout, exits)
             VALUES ($1, $2, COALESCE($3, 'forest'), COALESCE($4, 16), COALESCE($5, 16),
                     COALESCE($6, '{}'::jsonb), COALESCE($7, '[]'::jsonb))
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&input.id)
        .bind(&input.title)
        .bind(&input.biome)
        .bind(input.width)
        .bind(input.height)
        .bind(&input.layout)
        .bind(&input.exits)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(pool: &PgPool, id: &str) -> StoreResult<Option<Node>> {
        let query = format!("SELECT {COLUMNS} FROM nodes WHERE id = $1");
        let node = sqlx::query_as::<_, Node>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(node)
    }

    pub async fn list(pool: &PgPool) -> StoreResult<Vec<Node>> {
        let query = format!("SELECT {COLUMNS} FROM nodes ORDER BY id");
        let nodes = sqlx::query_as::<_, Node>(&query).fetch_all(pool).await?;
        Ok(nodes)
    }

    /// The node plus the actors standing in it and its fact map.
    pub async fn fetch_view(pool: &PgPool, id: &str) -> StoreResult<Option<NodeView>> {
        let Some(node) = Self::find(pool, id).await? else {
            return Ok(None);
        };

        let actors = sqlx::query_as::<_, ActorPresence>(
            "SELECT id, kind, archetype, x, y, hp, mood, trust
             FROM actors WHERE node_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let facts: Vec<(String, serde_json::Value)> =
            sqlx::query_as("SELECT k, v FROM facts WHERE node_id = $1")
                .bind(id)
                .fetch_all(pool)
                .await?;

        Ok(Some(NodeView {
            node,
            actors,
            facts: facts.into_iter().collect(),
        }))
    }

    /// Replace a node's exit list.
    pub async fn set_exits(pool: &PgPool, id: &str, exits: &serde_json::Value) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE nodes SET exits = $2 WHERE id = $1")
            .bind(id)
            .bind(exits)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a node. Facts cascade away; actors and items at the node keep
    /// their rows with `node_id` nulled by the foreign keys.
    pub async fn delete(pool: &PgPool, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM nodes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
