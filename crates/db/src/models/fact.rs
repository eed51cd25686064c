//! Node fact model (arbitrary keyed state flags on a node).

use serde::Serialize;
use sqlx::FromRow;

use embermark_core::types::EntityId;

/// A row from the `facts` table; unique per (node, key), cascades with the
/// node.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Fact {
    pub node_id: EntityId,
    pub k: String,
    pub v: serde_json::Value,
}
