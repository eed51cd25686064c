//! Repository for the `items` table.

use sqlx::PgPool;
use uuid::Uuid;

use embermark_core::types::ItemId;

use crate::error::StoreResult;
use crate::models::item::{CreateItem, Item, ItemView};

const COLUMNS: &str = "id, kind_id, owner_id, node_id, charges, durability, meta, created_at";

/// Joined (item, kind title) selection used by the view queries.
const VIEW_SELECT: &str = "SELECT i.id, i.kind_id, k.title, i.charges, i.durability
     FROM items i JOIN item_kinds k ON k.id = i.kind_id";

/// Provides CRUD operations for item instances.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item instance, returning the created row.
    ///
    /// An unknown `kind_id` is a referential violation. `charges` and
    /// `durability` default from the kind's base values when omitted.
    pub async fn create(pool: &PgPool, input: &CreateItem) -> StoreResult<Item> {
        let id = input.id.unwrap_or_else(Uuid::new_v4);
        let query = format!(
            "INSERT INTO items (id, kind_id, owner_id, node_id, charges, durability, meta)
             VALUES ($1, $2, $3, $4,
                     COALESCE($5, (SELECT base_charges FROM item_kinds WHERE id = $2)),
                     COALESCE($6, (SELECT base_durability FROM item_kinds WHERE id = $2)),
                     COALESCE($7, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(&input.kind_id)
            .bind(&input.owner_id)
            .bind(&input.node_id)
            .bind(input.charges)
            .bind(input.durability)
            .bind(&input.meta)
            .fetch_one(pool)
            .await?;
        Ok(item)
    }

    pub async fn find(pool: &PgPool, id: ItemId) -> StoreResult<Option<Item>> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        let item = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(item)
    }

    /// Joined read shape for a single item.
    pub async fn view(pool: &PgPool, id: ItemId) -> StoreResult<Option<ItemView>> {
        let query = format!("{VIEW_SELECT} WHERE i.id = $1");
        let view = sqlx::query_as::<_, ItemView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(view)
    }

    /// Joined read shapes for a set of items (backpack contents and the like).
    /// Order follows the id set, not the input.
    pub async fn views(pool: &PgPool, ids: &[ItemId]) -> StoreResult<Vec<ItemView>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("{VIEW_SELECT} WHERE i.id = ANY($1) ORDER BY k.title, i.id");
        let views = sqlx::query_as::<_, ItemView>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(views)
    }

    /// Items lying on the ground at a node.
    pub async fn list_at_node(pool: &PgPool, node_id: &str) -> StoreResult<Vec<ItemView>> {
        let query = format!("{VIEW_SELECT} WHERE i.node_id = $1 ORDER BY k.title, i.id");
        let views = sqlx::query_as::<_, ItemView>(&query)
            .bind(node_id)
            .fetch_all(pool)
            .await?;
        Ok(views)
    }

    /// Overwrite remaining charges (NULL means charges stop applying).
    pub async fn set_charges(
        pool: &PgPool,
        id: ItemId,
        charges: Option<i32>,
    ) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE items SET charges = $2 WHERE id = $1")
            .bind(id)
            .bind(charges)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite remaining durability.
    pub async fn set_durability(
        pool: &PgPool,
        id: ItemId,
        durability: Option<i32>,
    ) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE items SET durability = $2 WHERE id = $1")
            .bind(id)
            .bind(durability)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an item. Container slots referencing it cascade; inventory
    /// columns are nulled by the foreign keys, and any backpack array entry
    /// is scrubbed here since arrays carry no referential action.
    pub async fn delete(pool: &PgPool, id: ItemId) -> StoreResult<bool> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "UPDATE inventories SET backpack = array_remove(backpack, $1)
             WHERE $1 = ANY(backpack)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
