//! Repository for the `item_kinds` catalog.

use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::item_kind::{ItemKind, SeedItemKind};

const COLUMNS: &str = "id, title, description, tags, handedness, stackable, base_charges, \
     base_durability, hands_required, grid_w, grid_h, max_weight_g, max_volume_ml, props";

/// Provides catalog seeding and lookups for item kinds.
pub struct ItemKindRepo;

impl ItemKindRepo {
    /// Insert-if-absent. Existing rows are left untouched; a half-specified
    /// grid (`grid_w` without `grid_h`) is rejected by the check constraint.
    /// Returns `true` when a row was created.
    pub async fn seed(pool: &PgPool, input: &SeedItemKind) -> StoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO item_kinds
                (id, title, description, tags, handedness, stackable, base_charges,
                 base_durability, hands_required, grid_w, grid_h, max_weight_g,
                 max_volume_ml, props)
             VALUES ($1, $2, $3, COALESCE($4, '{}'), COALESCE($5, 'one_hand'),
                     COALESCE($6, FALSE), $7, $8, COALESCE($9, 1), $10, $11, $12, $13,
                     COALESCE($14, '{}'::jsonb))
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&input.id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.tags)
        .bind(input.handedness)
        .bind(input.stackable)
        .bind(input.base_charges)
        .bind(input.base_durability)
        .bind(input.hands_required)
        .bind(input.grid_w)
        .bind(input.grid_h)
        .bind(input.max_weight_g)
        .bind(input.max_volume_ml)
        .bind(&input.props)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(pool: &PgPool, id: &str) -> StoreResult<Option<ItemKind>> {
        let query = format!("SELECT {COLUMNS} FROM item_kinds WHERE id = $1");
        let kind = sqlx::query_as::<_, ItemKind>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(kind)
    }

    pub async fn list(pool: &PgPool) -> StoreResult<Vec<ItemKind>> {
        let query = format!("SELECT {COLUMNS} FROM item_kinds ORDER BY id");
        let kinds = sqlx::query_as::<_, ItemKind>(&query).fetch_all(pool).await?;
        Ok(kinds)
    }

    /// The kind backing a concrete item instance.
    pub async fn find_for_item(
        pool: &PgPool,
        item_id: embermark_core::types::ItemId,
    ) -> StoreResult<Option<ItemKind>> {
        let query = format!(
            "SELECT {} FROM item_kinds k JOIN items i ON i.kind_id = k.id WHERE i.id = $1",
            COLUMNS
                .split(", ")
                .map(|c| format!("k.{c}"))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let kind = sqlx::query_as::<_, ItemKind>(&query)
            .bind(item_id)
            .fetch_optional(pool)
            .await?;
        Ok(kind)
    }
}
