//! Narration style presets.

use sqlx::PgPool;

use embermark_core::narrative::NarrativeConfig;

use crate::error::StoreResult;
use crate::models::narrative_style::{NarrativeStyle, SeedNarrativeStyle};

const COLUMNS: &str = "id, title, config";

pub struct NarrativeStyleRepo;

impl NarrativeStyleRepo {
    /// Insert a style preset, skipping ids that already exist.
    pub async fn seed(pool: &PgPool, input: &SeedNarrativeStyle) -> StoreResult<bool> {
        let query = format!(
            "INSERT INTO narrative_styles (id, title, config)
             VALUES ($1, $2, COALESCE($3, '{{}}'::jsonb))
             ON CONFLICT (id) DO NOTHING"
        );
        let result = sqlx::query(&query)
            .bind(&input.id)
            .bind(&input.title)
            .bind(&input.config)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(pool: &PgPool, id: &str) -> StoreResult<Option<NarrativeStyle>> {
        let query = format!("SELECT {COLUMNS} FROM narrative_styles WHERE id = $1");
        let style = sqlx::query_as::<_, NarrativeStyle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(style)
    }

    pub async fn list(pool: &PgPool) -> StoreResult<Vec<NarrativeStyle>> {
        let query = format!("SELECT {COLUMNS} FROM narrative_styles ORDER BY id");
        let styles = sqlx::query_as::<_, NarrativeStyle>(&query)
            .fetch_all(pool)
            .await?;
        Ok(styles)
    }

    /// Typed config for a style. Unknown ids and malformed configs both fall
    /// back to the neutral defaults so narration can always proceed.
    pub async fn config(pool: &PgPool, id: &str) -> StoreResult<NarrativeConfig> {
        let style = Self::find(pool, id).await?;
        Ok(style
            .map(|s| NarrativeConfig::from_value(s.config))
            .unwrap_or_default())
    }
}
