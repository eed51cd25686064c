//! Actor (player or NPC) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use embermark_core::types::{EntityId, Timestamp};

/// An actor row from the `actors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Actor {
    pub id: EntityId,
    /// Nulled (not deleted) when the node goes away.
    pub node_id: Option<EntityId>,
    /// `player` or `npc`.
    pub kind: String,
    pub archetype: Option<String>,
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub mood: String,
    pub trust: i32,
    pub level: i32,
    pub skill_points: i32,
    pub meta: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for creating a new actor.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActor {
    pub id: EntityId,
    pub kind: String,
    pub node_id: Option<EntityId>,
    pub archetype: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    /// Defaults to 100 if omitted.
    pub hp: Option<i32>,
    /// Defaults to `neutral`.
    pub mood: Option<String>,
    /// Defaults to 50.
    pub trust: Option<i32>,
    pub level: Option<i32>,
    pub skill_points: Option<i32>,
    pub meta: Option<serde_json::Value>,
}

impl CreateActor {
    /// A bare actor with database defaults for everything else.
    pub fn new(id: impl Into<EntityId>, kind: impl Into<String>) -> Self {
        CreateActor {
            id: id.into(),
            kind: kind.into(),
            node_id: None,
            archetype: None,
            x: None,
            y: None,
            hp: None,
            mood: None,
            trust: None,
            level: None,
            skill_points: None,
            meta: None,
        }
    }
}

/// DTO for updating an existing actor. All fields are optional; node
/// membership changes go through `ActorRepo::move_to_node` instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateActor {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub hp: Option<i32>,
    pub mood: Option<String>,
    pub trust: Option<i32>,
    pub level: Option<i32>,
    pub skill_points: Option<i32>,
    pub meta: Option<serde_json::Value>,
}
