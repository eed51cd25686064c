//! Actor status (timed effect) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use embermark_core::types::{EntityId, Timestamp};

/// An active effect row from `actor_statuses`; one row per (actor, status).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActorStatus {
    pub actor_id: EntityId,
    /// Effect identifier, e.g. `burn`, `stun`. Not a foreign key.
    pub status_id: String,
    pub turns_left: i32,
    pub stacks: i32,
    pub intensity: f32,
    /// Who inflicted the effect; survives refreshes that carry no source.
    pub source_id: Option<EntityId>,
    pub created_at: Timestamp,
}

/// DTO for applying or refreshing a status.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyStatus {
    pub actor_id: EntityId,
    pub status_id: String,
    /// Defaults to 1 if omitted.
    pub turns_left: Option<i32>,
    /// Defaults to 1.
    pub stacks: Option<i32>,
    /// Defaults to 1.0.
    pub intensity: Option<f32>,
    pub source_id: Option<EntityId>,
}

impl ApplyStatus {
    pub fn new(actor_id: impl Into<EntityId>, status_id: impl Into<String>) -> Self {
        ApplyStatus {
            actor_id: actor_id.into(),
            status_id: status_id.into(),
            turns_left: None,
            stacks: None,
            intensity: None,
            source_id: None,
        }
    }

    pub fn lasting(mut self, turns: i32) -> Self {
        self.turns_left = Some(turns);
        self
    }
}

/// A (actor, status) pair that expired during a decay pass.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExpiredStatus {
    pub actor_id: EntityId,
    pub status_id: String,
}
