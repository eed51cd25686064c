//! Per-node key/value world state.

use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::fact::Fact;

pub struct FactRepo;

impl FactRepo {
    /// Set a fact on a node, overwriting any previous value for the key.
    pub async fn set(
        pool: &PgPool,
        node_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> StoreResult<Fact> {
        let fact = sqlx::query_as::<_, Fact>(
            "INSERT INTO facts (node_id, k, v) VALUES ($1, $2, $3)
             ON CONFLICT (node_id, k) DO UPDATE SET v = EXCLUDED.v
             RETURNING node_id, k, v",
        )
        .bind(node_id)
        .bind(key)
        .bind(value)
        .fetch_one(pool)
        .await?;
        Ok(fact)
    }

    pub async fn get(
        pool: &PgPool,
        node_id: &str,
        key: &str,
    ) -> StoreResult<Option<serde_json::Value>> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT v FROM facts WHERE node_id = $1 AND k = $2")
                .bind(node_id)
                .bind(key)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(v,)| v))
    }

    pub async fn for_node(pool: &PgPool, node_id: &str) -> StoreResult<Vec<Fact>> {
        let facts = sqlx::query_as::<_, Fact>(
            "SELECT node_id, k, v FROM facts WHERE node_id = $1 ORDER BY k",
        )
        .bind(node_id)
        .fetch_all(pool)
        .await?;
        Ok(facts)
    }

    pub async fn remove(pool: &PgPool, node_id: &str, key: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM facts WHERE node_id = $1 AND k = $2")
            .bind(node_id)
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
