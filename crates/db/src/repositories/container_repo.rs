//! Positional grid storage inside carried container items.

use sqlx::PgPool;

use embermark_core::location::ItemLocation;
use embermark_core::types::ItemId;

use crate::error::{StoreError, StoreResult};
use crate::models::container::OccupiedSlot;
use crate::repositories::{ItemKindRepo, LocationRepo};

pub struct ContainerRepo;

impl ContainerRepo {
    /// Occupied cells of a container, with item titles resolved.
    pub async fn contents(pool: &PgPool, container_item_id: ItemId) -> StoreResult<Vec<OccupiedSlot>> {
        let slots = sqlx::query_as::<_, OccupiedSlot>(
            "SELECT s.slot_x, s.slot_y, s.item_id, k.title, i.charges, i.durability
             FROM carried_container_slots s
             JOIN items i ON i.id = s.item_id
             JOIN item_kinds k ON k.id = i.kind_id
             WHERE s.container_item_id = $1 AND s.item_id IS NOT NULL
             ORDER BY s.slot_y, s.slot_x",
        )
        .bind(container_item_id)
        .fetch_all(pool)
        .await?;
        Ok(slots)
    }

    /// First empty cell in row-major order, or `None` when the grid is full.
    pub async fn first_free_slot(
        pool: &PgPool,
        container_item_id: ItemId,
    ) -> StoreResult<Option<(i32, i32)>> {
        let kind = ItemKindRepo::find_for_item(pool, container_item_id)
            .await?
            .ok_or_else(|| StoreError::not_found("item", container_item_id.to_string()))?;
        let Some((w, h)) = kind.grid() else {
            return Err(StoreError::invalid_location(
                "target item is not a grid container",
            ));
        };

        let taken: Vec<(i32, i32)> = sqlx::query_as(
            "SELECT slot_x, slot_y FROM carried_container_slots
             WHERE container_item_id = $1 AND item_id IS NOT NULL",
        )
        .bind(container_item_id)
        .fetch_all(pool)
        .await?;

        for y in 0..h {
            for x in 0..w {
                if !taken.contains(&(x, y)) {
                    return Ok(Some((x, y)));
                }
            }
        }
        Ok(None)
    }

    /// Place an item in a specific cell.
    pub async fn put(
        pool: &PgPool,
        container_item_id: ItemId,
        item_id: ItemId,
        x: i32,
        y: i32,
    ) -> StoreResult<()> {
        LocationRepo::move_to(
            pool,
            item_id,
            &ItemLocation::ContainerSlot {
                container_item_id,
                x,
                y,
            },
        )
        .await
    }

    /// Place an item in the first free cell.
    pub async fn put_anywhere(
        pool: &PgPool,
        container_item_id: ItemId,
        item_id: ItemId,
    ) -> StoreResult<(i32, i32)> {
        let (x, y) = Self::first_free_slot(pool, container_item_id)
            .await?
            .ok_or_else(|| StoreError::invalid_location("container is full"))?;
        Self::put(pool, container_item_id, item_id, x, y).await?;
        Ok((x, y))
    }

    /// Take an item out of its cell into the carrier's backpack.
    pub async fn take(pool: &PgPool, actor_id: &str, item_id: ItemId) -> StoreResult<()> {
        LocationRepo::move_to(
            pool,
            item_id,
            &ItemLocation::Backpack {
                actor_id: actor_id.to_owned(),
            },
        )
        .await
    }
}
