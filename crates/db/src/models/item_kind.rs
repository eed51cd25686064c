//! Item kind (catalog template) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use embermark_core::types::EntityId;

/// How many hands a kind occupies when wielded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "handedness", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    OneHand,
    TwoHands,
}

/// An item kind row from the `item_kinds` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemKind {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub handedness: Handedness,
    pub stackable: bool,
    /// NULL means "charges do not apply to this kind", distinct from 0.
    pub base_charges: Option<i32>,
    pub base_durability: Option<i32>,
    pub hands_required: i32,
    pub grid_w: Option<i32>,
    pub grid_h: Option<i32>,
    pub max_weight_g: Option<i32>,
    pub max_volume_ml: Option<i32>,
    pub props: serde_json::Value,
}

impl ItemKind {
    /// Container-ness is duck-typed: grid dimensions or a `props.container`
    /// flag. Consumers must accept either signal.
    pub fn is_container(&self) -> bool {
        self.grid().is_some()
            || self
                .props
                .get("container")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
    }

    /// Grid dimensions when the kind is a positional container.
    pub fn grid(&self) -> Option<(i32, i32)> {
        self.grid_w.zip(self.grid_h)
    }

    pub fn is_two_handed(&self) -> bool {
        self.handedness == Handedness::TwoHands
    }
}

/// DTO for idempotent catalog seeding.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedItemKind {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Defaults to `one_hand` if omitted.
    pub handedness: Option<Handedness>,
    pub stackable: Option<bool>,
    pub base_charges: Option<i32>,
    pub base_durability: Option<i32>,
    pub hands_required: Option<i32>,
    pub grid_w: Option<i32>,
    pub grid_h: Option<i32>,
    pub max_weight_g: Option<i32>,
    pub max_volume_ml: Option<i32>,
    pub props: Option<serde_json::Value>,
}

impl SeedItemKind {
    pub fn new(id: impl Into<EntityId>, title: impl Into<String>) -> Self {
        SeedItemKind {
            id: id.into(),
            title: title.into(),
            description: None,
            tags: None,
            handedness: None,
            stackable: None,
            base_charges: None,
            base_durability: None,
            hands_required: None,
            grid_w: None,
            grid_h: None,
            max_weight_g: None,
            max_volume_ml: None,
            props: None,
        }
    }
}
