//! Actor inventory access and the equip/stash verbs.
//!
//! Each verb here is a thin intent wrapper that delegates the actual move to
//! [`LocationRepo`], so slot exclusivity is enforced in exactly one place.

use std::collections::HashMap;

use sqlx::PgPool;

use embermark_core::location::{Hand, ItemLocation};
use embermark_core::types::ItemId;

use crate::error::{StoreError, StoreResult};
use crate::models::inventory::{Inventory, InventoryView};
use crate::repositories::{ItemRepo, LocationRepo};

const COLUMNS: &str = "actor_id, left_item, right_item, hidden_item, equipped_bag, backpack";

pub struct InventoryRepo;

impl InventoryRepo {
    /// Create the actor's inventory row if it does not exist yet.
    pub async fn ensure(pool: &PgPool, actor_id: &str) -> StoreResult<Inventory> {
        sqlx::query("INSERT INTO inventories (actor_id) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(actor_id)
            .execute(pool)
            .await?;
        Self::find(pool, actor_id)
            .await?
            .ok_or_else(|| StoreError::not_found("inventory", actor_id))
    }

    pub async fn find(pool: &PgPool, actor_id: &str) -> StoreResult<Option<Inventory>> {
        let query = format!("SELECT {COLUMNS} FROM inventories WHERE actor_id = $1");
        let inventory = sqlx::query_as::<_, Inventory>(&query)
            .bind(actor_id)
            .fetch_optional(pool)
            .await?;
        Ok(inventory)
    }

    /// Read-model of the inventory with item titles resolved, for prompt
    /// assembly. Missing inventory rows read as an empty inventory.
    pub async fn fetch_view(pool: &PgPool, actor_id: &str) -> StoreResult<InventoryView> {
        let Some(inventory) = Self::find(pool, actor_id).await? else {
            return Ok(InventoryView::default());
        };

        let mut ids: Vec<ItemId> = inventory
            .left_item
            .into_iter()
            .chain(inventory.right_item)
            .chain(inventory.hidden_item)
            .chain(inventory.equipped_bag)
            .collect();
        ids.extend(&inventory.backpack);

        let mut by_id: HashMap<ItemId, _> = ItemRepo::views(pool, &ids)
            .await?
            .into_iter()
            .map(|view| (view.id, view))
            .collect();

        Ok(InventoryView {
            left: inventory.left_item.and_then(|id| by_id.remove(&id)),
            right: inventory.right_item.and_then(|id| by_id.remove(&id)),
            hidden: inventory.hidden_item.and_then(|id| by_id.remove(&id)),
            equipped_bag: inventory.equipped_bag.and_then(|id| by_id.remove(&id)),
            backpack: inventory
                .backpack
                .iter()
                .filter_map(|id| by_id.remove(id))
                .collect(),
        })
    }

    pub async fn equip_hand(
        pool: &PgPool,
        actor_id: &str,
        hand: Hand,
        item_id: ItemId,
    ) -> StoreResult<()> {
        LocationRepo::move_to(
            pool,
            item_id,
            &ItemLocation::Hand {
                actor_id: actor_id.to_owned(),
                hand,
            },
        )
        .await
    }

    /// Move whatever the hand holds into the actor's backpack.
    pub async fn unequip_hand(pool: &PgPool, actor_id: &str, hand: Hand) -> StoreResult<ItemId> {
        let item_id = Self::hand_item(pool, actor_id, hand)
            .await?
            .ok_or_else(|| StoreError::invalid_location(format!("{hand} hand is empty")))?;
        LocationRepo::move_to(
            pool,
            item_id,
            &ItemLocation::Backpack {
                actor_id: actor_id.to_owned(),
            },
        )
        .await?;
        Ok(item_id)
    }

    pub async fn stash_hidden(pool: &PgPool, actor_id: &str, item_id: ItemId) -> StoreResult<()> {
        LocationRepo::move_to(
            pool,
            item_id,
            &ItemLocation::Hidden {
                actor_id: actor_id.to_owned(),
            },
        )
        .await
    }

    pub async fn stash_backpack(
        pool: &PgPool,
        actor_id: &str,
        item_id: ItemId,
    ) -> StoreResult<()> {
        LocationRepo::move_to(
            pool,
            item_id,
            &ItemLocation::Backpack {
                actor_id: actor_id.to_owned(),
            },
        )
        .await
    }

    pub async fn equip_bag(pool: &PgPool, actor_id: &str, item_id: ItemId) -> StoreResult<()> {
        LocationRepo::move_to(
            pool,
            item_id,
            &ItemLocation::EquippedBag {
                actor_id: actor_id.to_owned(),
            },
        )
        .await
    }

    /// Take the worn bag off into the backpack.
    pub async fn unequip_bag(pool: &PgPool, actor_id: &str) -> StoreResult<ItemId> {
        let inventory = Self::find(pool, actor_id)
            .await?
            .ok_or_else(|| StoreError::not_found("inventory", actor_id))?;
        let item_id = inventory
            .equipped_bag
            .ok_or_else(|| StoreError::invalid_location("no bag equipped"))?;
        LocationRepo::move_to(
            pool,
            item_id,
            &ItemLocation::Backpack {
                actor_id: actor_id.to_owned(),
            },
        )
        .await?;
        Ok(item_id)
    }

    /// Drop an item from anywhere in the inventory onto the ground.
    pub async fn drop_to_node(pool: &PgPool, item_id: ItemId, node_id: &str) -> StoreResult<()> {
        LocationRepo::move_to(
            pool,
            item_id,
            &ItemLocation::Node {
                node_id: node_id.to_owned(),
            },
        )
        .await
    }

    async fn hand_item(
        pool: &PgPool,
        actor_id: &str,
        hand: Hand,
    ) -> StoreResult<Option<ItemId>> {
        let query = format!(
            "SELECT {} FROM inventories WHERE actor_id = $1",
            hand.column()
        );
        let row: Option<(Option<ItemId>,)> = sqlx::query_as(&query)
            .bind(actor_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.and_then(|(id,)| id))
    }
}
