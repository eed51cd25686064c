//! Inventory (equipped/carried state) model and views.

use serde::Serialize;
use sqlx::FromRow;

use embermark_core::types::{EntityId, ItemId};

use crate::models::item::ItemView;

/// An inventory row from the `inventories` table; 1:1 with its actor.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Inventory {
    pub actor_id: EntityId,
    pub left_item: Option<ItemId>,
    pub right_item: Option<ItemId>,
    pub hidden_item: Option<ItemId>,
    pub equipped_bag: Option<ItemId>,
    /// Flat carried pool; loosely ordered, no positional semantics.
    pub backpack: Vec<ItemId>,
}

/// Aggregate read shape with the referenced items joined in.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InventoryView {
    pub left: Option<ItemView>,
    pub right: Option<ItemView>,
    pub hidden: Option<ItemView>,
    pub equipped_bag: Option<ItemView>,
    pub backpack: Vec<ItemView>,
}
