//! Append-only NPC memory log.

use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::memory::{NpcMemory, RecordMemory};

const COLUMNS: &str = "id, actor_id, category, event, description, payload, ts";

pub struct MemoryRepo;

impl MemoryRepo {
    /// Append a memory for an NPC. An unknown actor is a referential
    /// violation.
    pub async fn record(pool: &PgPool, input: &RecordMemory) -> StoreResult<NpcMemory> {
        let query = format!(
            "INSERT INTO npc_memories (actor_id, category, event, description, payload)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let memory = sqlx::query_as::<_, NpcMemory>(&query)
            .bind(&input.actor_id)
            .bind(&input.category)
            .bind(&input.event)
            .bind(&input.description)
            .bind(&input.payload)
            .fetch_one(pool)
            .await?;
        Ok(memory)
    }

    /// Most recent memories of an actor, newest first.
    pub async fn recent(pool: &PgPool, actor_id: &str, limit: i64) -> StoreResult<Vec<NpcMemory>> {
        let query = format!(
            "SELECT {COLUMNS} FROM npc_memories
             WHERE actor_id = $1
             ORDER BY ts DESC, id DESC
             LIMIT $2"
        );
        let memories = sqlx::query_as::<_, NpcMemory>(&query)
            .bind(actor_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(memories)
    }

    /// Recent memories filtered to one category.
    pub async fn recent_in_category(
        pool: &PgPool,
        actor_id: &str,
        category: &str,
        limit: i64,
    ) -> StoreResult<Vec<NpcMemory>> {
        let query = format!(
            "SELECT {COLUMNS} FROM npc_memories
             WHERE actor_id = $1 AND category = $2
             ORDER BY ts DESC, id DESC
             LIMIT $3"
        );
        let memories = sqlx::query_as::<_, NpcMemory>(&query)
            .bind(actor_id)
            .bind(category)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(memories)
    }
}
