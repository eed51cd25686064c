//! The polymorphic item location.
//!
//! The schema spreads "where is this item" across five mechanisms: two hand
//! columns, a hidden-slot column, an equipped-bag column, the flat `backpack`
//! array, and the positional `carried_container_slots` table. The Rust API
//! collapses them into one [`ItemLocation`] enum so the exclusivity invariant
//! (an item is held by at most one mechanism at any time) can be enforced in
//! a single place.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, ItemId};

/// Which hand of an actor an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// The corresponding column in the `inventories` table.
    pub fn column(self) -> &'static str {
        match self {
            Hand::Left => "left_item",
            Hand::Right => "right_item",
        }
    }

    pub fn other(self) -> Hand {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hand::Left => f.write_str("left"),
            Hand::Right => f.write_str("right"),
        }
    }
}

/// Every place a concrete item instance can be.
///
/// `Backpack` is the actor's flat, loosely-ordered carried pool (the
/// `inventories.backpack` array) and carries no position. `ContainerSlot` is a
/// cell of a grid container item (backpack/sack kinds with grid dimensions);
/// the two representations are mutually exclusive per item kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemLocation {
    /// Lying on the ground in a node.
    Node { node_id: EntityId },
    /// Wielded in one of an actor's hands.
    Hand { actor_id: EntityId, hand: Hand },
    /// Concealed in the actor's hidden slot.
    Hidden { actor_id: EntityId },
    /// Worn on the actor's back (the item itself must be a container kind).
    EquippedBag { actor_id: EntityId },
    /// In the actor's flat carried pool.
    Backpack { actor_id: EntityId },
    /// In a grid cell of a carried container item.
    ContainerSlot {
        container_item_id: ItemId,
        x: i32,
        y: i32,
    },
}

impl ItemLocation {
    /// The actor carrying the item, if the location is on a person at all.
    ///
    /// `Node` and `ContainerSlot` return `None`: a slotted item is reachable
    /// only through its container, whoever carries that.
    pub fn carrier(&self) -> Option<&EntityId> {
        match self {
            ItemLocation::Hand { actor_id, .. }
            | ItemLocation::Hidden { actor_id }
            | ItemLocation::EquippedBag { actor_id }
            | ItemLocation::Backpack { actor_id } => Some(actor_id),
            ItemLocation::Node { .. } | ItemLocation::ContainerSlot { .. } => None,
        }
    }

    /// True for locations that live in the `inventories` row of an actor.
    pub fn is_inventory_slot(&self) -> bool {
        matches!(
            self,
            ItemLocation::Hand { .. }
                | ItemLocation::Hidden { .. }
                | ItemLocation::EquippedBag { .. }
                | ItemLocation::Backpack { .. }
        )
    }
}
