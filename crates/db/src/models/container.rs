//! Carried-container slot model (one grid cell of a container item).

use serde::Serialize;
use sqlx::FromRow;

use embermark_core::types::ItemId;

/// A row from `carried_container_slots`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContainerSlot {
    pub container_item_id: ItemId,
    pub slot_x: i32,
    pub slot_y: i32,
    pub item_id: Option<ItemId>,
}

/// An occupied grid cell joined with the contained item.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OccupiedSlot {
    pub slot_x: i32,
    pub slot_y: i32,
    pub item_id: ItemId,
    pub title: String,
    pub charges: Option<i32>,
    pub durability: Option<i32>,
}
