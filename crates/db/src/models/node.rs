//! Node (location/room) model and DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use embermark_core::types::{EntityId, Timestamp};

/// A node row from the `nodes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Node {
    pub id: EntityId,
    pub title: String,
    pub biome: String,
    pub width: i32,
    pub height: i32,
    /// NOT NULL in the database; defaults to `{}`.
    pub layout: serde_json::Value,
    /// NOT NULL; defaults to `[]`. Exit targets are not FK-enforced.
    pub exits: serde_json::Value,
    pub created_at: Timestamp,
}

/// One exit as stored inside `nodes.exits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exit {
    pub id: String,
    pub x: i32,
    pub y: i32,
    /// Target node id; may point at a node that does not exist yet.
    pub to: EntityId,
}

/// DTO for idempotent node seeding.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedNode {
    pub id: EntityId,
    pub title: String,
    /// Defaults to `forest` if omitted.
    pub biome: Option<String>,
    /// Defaults to 16x16 if omitted.
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub layout: Option<serde_json::Value>,
    pub exits: Option<serde_json::Value>,
}

/// An actor as listed inside a node view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActorPresence {
    pub id: EntityId,
    pub kind: String,
    pub archetype: Option<String>,
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub mood: String,
    pub trust: i32,
}

/// Aggregate read shape: the node, the actors standing in it, and its facts.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    #[serde(flatten)]
    pub node: Node,
    pub actors: Vec<ActorPresence>,
    pub facts: BTreeMap<String, serde_json::Value>,
}
