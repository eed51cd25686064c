//! NPC memory model (append-only recollections of interactions).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use embermark_core::types::{EntityId, Timestamp};

/// A row from `npc_memories`; cascades with the actor.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NpcMemory {
    pub id: i64,
    pub actor_id: EntityId,
    /// e.g. `talk_positive`, `combat`.
    pub category: String,
    pub event: String,
    pub description: Option<String>,
    pub payload: Option<serde_json::Value>,
    pub ts: Timestamp,
}

/// DTO for recording a new memory.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordMemory {
    pub actor_id: EntityId,
    pub category: String,
    pub event: String,
    pub description: Option<String>,
    pub payload: Option<serde_json::Value>,
}
