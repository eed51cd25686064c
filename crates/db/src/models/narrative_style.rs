//! Narrative style model (phrasing configuration for the text generator).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use embermark_core::types::EntityId;

/// A row from `narrative_styles`. The `config` document's shape
/// (`tone`/`max_chars`/`persona`) is the narration component's contract;
/// the store only guarantees it holds valid JSON.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NarrativeStyle {
    pub id: EntityId,
    pub title: String,
    pub config: serde_json::Value,
}

/// DTO for idempotent style seeding.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedNarrativeStyle {
    pub id: EntityId,
    pub title: String,
    pub config: Option<serde_json::Value>,
}
