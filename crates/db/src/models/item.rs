//! Item instance model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use embermark_core::types::{EntityId, ItemId, Timestamp};

/// An item row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub kind_id: EntityId,
    /// Set while the item is in an actor's inventory; survives the actor.
    pub owner_id: Option<EntityId>,
    /// Set while the item lies on the ground; survives the node.
    pub node_id: Option<EntityId>,
    /// NULL when charges do not apply to the kind, 0 when depleted.
    pub charges: Option<i32>,
    pub durability: Option<i32>,
    pub meta: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for creating a new item instance.
///
/// `charges`/`durability` default from the kind's base values when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    /// Generated when omitted.
    pub id: Option<ItemId>,
    pub kind_id: EntityId,
    pub owner_id: Option<EntityId>,
    pub node_id: Option<EntityId>,
    pub charges: Option<i32>,
    pub durability: Option<i32>,
    pub meta: Option<serde_json::Value>,
}

impl CreateItem {
    pub fn of_kind(kind_id: impl Into<EntityId>) -> Self {
        CreateItem {
            id: None,
            kind_id: kind_id.into(),
            owner_id: None,
            node_id: None,
            charges: None,
            durability: None,
            meta: None,
        }
    }
}

/// Joined read shape (item + kind title) used by inventory, container, and
/// ground views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub kind_id: EntityId,
    pub title: String,
    pub charges: Option<i32>,
    pub durability: Option<i32>,
}
