//! Skill catalog and actor skill grant models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use embermark_core::types::{EntityId, Timestamp};

/// A learnable ability from the `skills` catalog.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Skill {
    pub id: EntityId,
    pub title: String,
    pub tags: Vec<String>,
    pub min_level: i32,
    pub props: serde_json::Value,
}

/// DTO for idempotent skill seeding.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSkill {
    pub id: EntityId,
    pub title: String,
    pub tags: Option<Vec<String>>,
    /// Defaults to 1 if omitted.
    pub min_level: Option<i32>,
    pub props: Option<serde_json::Value>,
}

/// A grant row from the `actor_skills` join table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActorSkill {
    pub actor_id: EntityId,
    pub skill_id: EntityId,
    pub learned_at: Timestamp,
}

/// A skill joined with when the actor learned it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LearnedSkill {
    pub id: EntityId,
    pub title: String,
    pub tags: Vec<String>,
    pub min_level: i32,
    pub props: serde_json::Value,
    pub learned_at: Timestamp,
}
