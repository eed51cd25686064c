//! The item location engine.
//!
//! The schema stores "where is this item" in five mechanisms (hand columns,
//! hidden slot, equipped bag, flat backpack array, positional container
//! slots). Every location mutation funnels through [`LocationRepo::move_to`],
//! which detaches the item from all mechanisms and attaches it at the target
//! inside one transaction, so no interleaving can observe or produce an item
//! in two places. The partial unique indexes on the inventory columns remain
//! as the last line of defense: a racing writer that slips past the row locks
//! surfaces as a [`StoreError::UniqueViolation`] to retry against current
//! state.

use sqlx::{PgConnection, PgPool};

use embermark_core::location::{Hand, ItemLocation};
use embermark_core::types::ItemId;

use crate::error::{StoreError, StoreResult};

/// Kind attributes the mover needs, fetched through the instance.
#[derive(Debug, sqlx::FromRow)]
struct KindFacts {
    two_handed: bool,
    grid_w: Option<i32>,
    grid_h: Option<i32>,
    props: serde_json::Value,
}

impl KindFacts {
    /// Duck-typed, matching `ItemKind::is_container`.
    fn is_container(&self) -> bool {
        self.grid_w.is_some() && self.grid_h.is_some()
            || self
                .props
                .get("container")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
    }
}

/// Locates and moves item instances across all location mechanisms.
pub struct LocationRepo;

impl LocationRepo {
    /// Derive the item's current location by inspecting every mechanism.
    ///
    /// Returns `Ok(None)` for an item that is nowhere (just created, or
    /// detached). Unknown items are a not-found error.
    pub async fn locate(pool: &PgPool, item_id: ItemId) -> StoreResult<Option<ItemLocation>> {
        let slot: Option<(String, String)> = sqlx::query_as(
            "SELECT actor_id,
                    CASE WHEN left_item = $1 THEN 'left'
                         WHEN right_item = $1 THEN 'right'
                         WHEN hidden_item = $1 THEN 'hidden'
                         ELSE 'equipped_bag' END
             FROM inventories
             WHERE left_item = $1 OR right_item = $1
                OR hidden_item = $1 OR equipped_bag = $1",
        )
        .bind(item_id)
        .fetch_optional(pool)
        .await?;
        if let Some((actor_id, slot)) = slot {
            return Ok(Some(match slot.as_str() {
                "left" => ItemLocation::Hand {
                    actor_id,
                    hand: Hand::Left,
                },
                "right" => ItemLocation::Hand {
                    actor_id,
                    hand: Hand::Right,
                },
                "hidden" => ItemLocation::Hidden { actor_id },
                _ => ItemLocation::EquippedBag { actor_id },
            }));
        }

        let pool_row: Option<(String,)> =
            sqlx::query_as("SELECT actor_id FROM inventories WHERE $1 = ANY(backpack)")
                .bind(item_id)
                .fetch_optional(pool)
                .await?;
        if let Some((actor_id,)) = pool_row {
            return Ok(Some(ItemLocation::Backpack { actor_id }));
        }

        let cell: Option<(ItemId, i32, i32)> = sqlx::query_as(
            "SELECT container_item_id, slot_x, slot_y
             FROM carried_container_slots WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_optional(pool)
        .await?;
        if let Some((container_item_id, x, y)) = cell {
            return Ok(Some(ItemLocation::ContainerSlot {
                container_item_id,
                x,
                y,
            }));
        }

        let ground: Option<(Option<String>,)> =
            sqlx::query_as("SELECT node_id FROM items WHERE id = $1")
                .bind(item_id)
                .fetch_optional(pool)
                .await?;
        match ground {
            None => Err(StoreError::not_found("item", item_id.to_string())),
            Some((Some(node_id),)) => Ok(Some(ItemLocation::Node { node_id })),
            Some((None,)) => Ok(None),
        }
    }

    /// Move an item to a new location, atomically.
    ///
    /// One transaction: lock the item row, validate the target, clear every
    /// mechanism that currently references the item, attach at the target.
    pub async fn move_to(
        pool: &PgPool,
        item_id: ItemId,
        target: &ItemLocation,
    ) -> StoreResult<()> {
        let mut tx = pool.begin().await?;

        // Locking the item row serializes concurrent movers of the same item.
        let locked: Option<(String,)> =
            sqlx::query_as("SELECT kind_id FROM items WHERE id = $1 FOR UPDATE")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(StoreError::not_found("item", item_id.to_string()));
        }

        Self::validate(&mut tx, item_id, target).await?;
        Self::detach_everywhere(&mut tx, item_id).await?;
        Self::attach(&mut tx, item_id, target).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Remove an item from every mechanism (consumed, despawned).
    pub async fn detach(pool: &PgPool, item_id: ItemId) -> StoreResult<()> {
        let mut tx = pool.begin().await?;
        let locked: Option<(String,)> =
            sqlx::query_as("SELECT kind_id FROM items WHERE id = $1 FOR UPDATE")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(StoreError::not_found("item", item_id.to_string()));
        }
        Self::detach_everywhere(&mut tx, item_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn kind_facts(
        tx: &mut PgConnection,
        item_id: ItemId,
    ) -> StoreResult<Option<KindFacts>> {
        let facts = sqlx::query_as::<_, KindFacts>(
            "SELECT k.handedness = 'two_hands' AS two_handed, k.grid_w, k.grid_h, k.props
             FROM items i JOIN item_kinds k ON k.id = i.kind_id
             WHERE i.id = $1",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?;
        Ok(facts)
    }

    /// Create the actor's inventory row if it is missing. An unknown actor
    /// surfaces as a referential violation through the foreign key.
    async fn ensure_inventory(tx: &mut PgConnection, actor_id: &str) -> StoreResult<()> {
        sqlx::query("INSERT INTO inventories (actor_id) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(actor_id)
            .execute(&mut *tx)
            .await?;
        Ok(())
    }

    async fn validate(
        tx: &mut PgConnection,
        item_id: ItemId,
        target: &ItemLocation,
    ) -> StoreResult<()> {
        match target {
            // Node existence is left to the foreign key.
            ItemLocation::Node { .. } => Ok(()),

            ItemLocation::Hand { actor_id, hand } => {
                Self::ensure_inventory(tx, actor_id).await?;
                let facts = Self::kind_facts(tx, item_id)
                    .await?
                    .ok_or_else(|| StoreError::not_found("item", item_id.to_string()))?;

                // Lock the inventory row so concurrent equips serialize.
                let (left, right): (Option<ItemId>, Option<ItemId>) = sqlx::query_as(
                    "SELECT left_item, right_item FROM inventories
                     WHERE actor_id = $1 FOR UPDATE",
                )
                .bind(actor_id)
                .fetch_one(&mut *tx)
                .await?;

                // The item being moved counts as an empty slot.
                let left = left.filter(|id| *id != item_id);
                let right = right.filter(|id| *id != item_id);

                if facts.two_handed {
                    if left.is_some() || right.is_some() {
                        return Err(StoreError::invalid_location(format!(
                            "two-handed item needs both hands of {actor_id} free"
                        )));
                    }
                    return Ok(());
                }

                let (occupant, other) = match hand {
                    Hand::Left => (left, right),
                    Hand::Right => (right, left),
                };
                if occupant.is_some() {
                    return Err(StoreError::invalid_location(format!(
                        "{hand} hand of {actor_id} is occupied"
                    )));
                }
                if let Some(other_item) = other {
                    let other_facts = Self::kind_facts(tx, other_item).await?;
                    if other_facts.map(|f| f.two_handed).unwrap_or(false) {
                        return Err(StoreError::invalid_location(format!(
                            "{actor_id} is wielding a two-handed item"
                        )));
                    }
                }
                Ok(())
            }

            ItemLocation::Hidden { actor_id } => {
                Self::ensure_inventory(tx, actor_id).await?;
                let (occupant,): (Option<ItemId>,) = sqlx::query_as(
                    "SELECT hidden_item FROM inventories WHERE actor_id = $1 FOR UPDATE",
                )
                .bind(actor_id)
                .fetch_one(&mut *tx)
                .await?;
                if occupant.filter(|id| *id != item_id).is_some() {
                    return Err(StoreError::invalid_location(format!(
                        "hidden slot of {actor_id} is occupied"
                    )));
                }
                Ok(())
            }

            ItemLocation::EquippedBag { actor_id } => {
                Self::ensure_inventory(tx, actor_id).await?;
                let facts = Self::kind_facts(tx, item_id)
                    .await?
                    .ok_or_else(|| StoreError::not_found("item", item_id.to_string()))?;
                if !facts.is_container() {
                    return Err(StoreError::invalid_location(
                        "only container kinds can be worn as a bag",
                    ));
                }
                let (occupant,): (Option<ItemId>,) = sqlx::query_as(
                    "SELECT equipped_bag FROM inventories WHERE actor_id = $1 FOR UPDATE",
                )
                .bind(actor_id)
                .fetch_one(&mut *tx)
                .await?;
                if occupant.filter(|id| *id != item_id).is_some() {
                    return Err(StoreError::invalid_location(format!(
                        "{actor_id} already wears a bag"
                    )));
                }
                Ok(())
            }

            ItemLocation::Backpack { actor_id } => Self::ensure_inventory(tx, actor_id).await,

            ItemLocation::ContainerSlot {
                container_item_id,
                x,
                y,
            } => {
                if *container_item_id == item_id {
                    return Err(StoreError::invalid_location(
                        "an item cannot contain itself",
                    ));
                }
                let facts = Self::kind_facts(tx, *container_item_id)
                    .await?
                    .ok_or_else(|| {
                        StoreError::not_found("item", container_item_id.to_string())
                    })?;
                let Some((w, h)) = facts.grid_w.zip(facts.grid_h) else {
                    return Err(StoreError::invalid_location(
                        "target item is not a grid container",
                    ));
                };
                if *x < 0 || *y < 0 || *x >= w || *y >= h {
                    return Err(StoreError::invalid_location(format!(
                        "slot ({x}, {y}) is outside the {w}x{h} grid"
                    )));
                }

                // Walk the containment chain upward: placing the item inside
                // a container that it (transitively) contains would orphan
                // the whole chain.
                let mut current = *container_item_id;
                loop {
                    let parent: Option<(ItemId,)> = sqlx::query_as(
                        "SELECT container_item_id FROM carried_container_slots
                         WHERE item_id = $1",
                    )
                    .bind(current)
                    .fetch_optional(&mut *tx)
                    .await?;
                    match parent {
                        Some((parent_id,)) if parent_id == item_id => {
                            return Err(StoreError::invalid_location(
                                "target container is inside the item being moved",
                            ));
                        }
                        Some((parent_id,)) => current = parent_id,
                        None => break,
                    }
                }
                Ok(())
            }
        }
    }

    /// Clear every reference to the item across all five mechanisms, plus the
    /// owner/ground columns on the item row itself.
    async fn detach_everywhere(tx: &mut PgConnection, item_id: ItemId) -> StoreResult<()> {
        sqlx::query(
            "UPDATE inventories SET
                left_item    = NULLIF(left_item, $1),
                right_item   = NULLIF(right_item, $1),
                hidden_item  = NULLIF(hidden_item, $1),
                equipped_bag = NULLIF(equipped_bag, $1),
                backpack     = array_remove(backpack, $1)
             WHERE left_item = $1 OR right_item = $1 OR hidden_item = $1
                OR equipped_bag = $1 OR $1 = ANY(backpack)",
        )
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE carried_container_slots SET item_id = NULL WHERE item_id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE items SET owner_id = NULL, node_id = NULL WHERE id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        Ok(())
    }

    async fn attach(
        tx: &mut PgConnection,
        item_id: ItemId,
        target: &ItemLocation,
    ) -> StoreResult<()> {
        match target {
            ItemLocation::Node { node_id } => {
                sqlx::query("UPDATE items SET node_id = $2 WHERE id = $1")
                    .bind(item_id)
                    .bind(node_id)
                    .execute(&mut *tx)
                    .await?;
            }
            ItemLocation::Hand { actor_id, hand } => {
                let query = match hand {
                    Hand::Left => "UPDATE inventories SET left_item = $2 WHERE actor_id = $1",
                    Hand::Right => "UPDATE inventories SET right_item = $2 WHERE actor_id = $1",
                };
                sqlx::query(query)
                    .bind(actor_id)
                    .bind(item_id)
                    .execute(&mut *tx)
                    .await?;
                Self::set_owner(tx, item_id, actor_id).await?;
            }
            ItemLocation::Hidden { actor_id } => {
                sqlx::query("UPDATE inventories SET hidden_item = $2 WHERE actor_id = $1")
                    .bind(actor_id)
                    .bind(item_id)
                    .execute(&mut *tx)
                    .await?;
                Self::set_owner(tx, item_id, actor_id).await?;
            }
            ItemLocation::EquippedBag { actor_id } => {
                sqlx::query("UPDATE inventories SET equipped_bag = $2 WHERE actor_id = $1")
                    .bind(actor_id)
                    .bind(item_id)
                    .execute(&mut *tx)
                    .await?;
                Self::set_owner(tx, item_id, actor_id).await?;
            }
            ItemLocation::Backpack { actor_id } => {
                sqlx::query(
                    "UPDATE inventories SET backpack = array_append(backpack, $2)
                     WHERE actor_id = $1",
                )
                .bind(actor_id)
                .bind(item_id)
                .execute(&mut *tx)
                .await?;
                Self::set_owner(tx, item_id, actor_id).await?;
            }
            ItemLocation::ContainerSlot {
                container_item_id,
                x,
                y,
            } => {
                // Conditional upsert: only lands in an empty cell.
                let result = sqlx::query(
                    "INSERT INTO carried_container_slots
                        (container_item_id, slot_x, slot_y, item_id)
                     VALUES ($1, $2, $3, $4)
                     ON CONFLICT (container_item_id, slot_x, slot_y)
                     DO UPDATE SET item_id = EXCLUDED.item_id
                     WHERE carried_container_slots.item_id IS NULL",
                )
                .bind(container_item_id)
                .bind(x)
                .bind(y)
                .bind(item_id)
                .execute(&mut *tx)
                .await?;
                if result.rows_affected() == 0 {
                    return Err(StoreError::invalid_location(format!(
                        "slot ({x}, {y}) is occupied"
                    )));
                }
            }
        }
        Ok(())
    }

    async fn set_owner(
        tx: &mut PgConnection,
        item_id: ItemId,
        actor_id: &str,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE items SET owner_id = $2 WHERE id = $1")
            .bind(item_id)
            .bind(actor_id)
            .execute(&mut *tx)
            .await?;
        Ok(())
    }
}
