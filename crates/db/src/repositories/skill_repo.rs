//! Skill catalog and per-actor learned skills.

use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::skill::{LearnedSkill, SeedSkill, Skill};

const COLUMNS: &str = "id, title, tags, min_level, props";

pub struct SkillRepo;

impl SkillRepo {
    /// Insert a catalog skill, skipping ids that already exist.
    pub async fn seed(pool: &PgPool, input: &SeedSkill) -> StoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO skills (id, title, tags, min_level, props)
             VALUES ($1, $2, COALESCE($3, '{}'::text[]), COALESCE($4, 1), COALESCE($5, '{}'::jsonb))
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&input.id)
        .bind(&input.title)
        .bind(&input.tags)
        .bind(input.min_level)
        .bind(&input.props)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(pool: &PgPool, id: &str) -> StoreResult<Option<Skill>> {
        let query = format!("SELECT {COLUMNS} FROM skills WHERE id = $1");
        let skill = sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(skill)
    }

    pub async fn list(pool: &PgPool) -> StoreResult<Vec<Skill>> {
        let query = format!("SELECT {COLUMNS} FROM skills ORDER BY id");
        let skills = sqlx::query_as::<_, Skill>(&query).fetch_all(pool).await?;
        Ok(skills)
    }

    /// Teach the actor a skill. Returns false when already known.
    pub async fn learn(pool: &PgPool, actor_id: &str, skill_id: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO actor_skills (actor_id, skill_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(actor_id)
        .bind(skill_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn forget(pool: &PgPool, actor_id: &str, skill_id: &str) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM actor_skills WHERE actor_id = $1 AND skill_id = $2")
                .bind(actor_id)
                .bind(skill_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn knows(pool: &PgPool, actor_id: &str, skill_id: &str) -> StoreResult<bool> {
        let (known,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM actor_skills WHERE actor_id = $1 AND skill_id = $2)",
        )
        .bind(actor_id)
        .bind(skill_id)
        .fetch_one(pool)
        .await?;
        Ok(known)
    }

    /// Learned skills with catalog data joined in, oldest first.
    pub async fn list_for_actor(pool: &PgPool, actor_id: &str) -> StoreResult<Vec<LearnedSkill>> {
        let skills = sqlx::query_as::<_, LearnedSkill>(
            "SELECT s.id, s.title, s.tags, s.min_level, s.props, a.learned_at
             FROM actor_skills a JOIN skills s ON s.id = a.skill_id
             WHERE a.actor_id = $1
             ORDER BY a.learned_at",
        )
        .bind(actor_id)
        .fetch_all(pool)
        .await?;
        Ok(skills)
    }
}
