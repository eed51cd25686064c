//! Integration tests for timed statuses and learned skills.

use assert_matches::assert_matches;
use sqlx::PgPool;

use embermark_db::error::StoreError;
use embermark_db::models::actor::CreateActor;
use embermark_db::models::skill::SeedSkill;
use embermark_db::models::status::ApplyStatus;
use embermark_db::repositories::{ActorRepo, SkillRepo, StatusRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_actors(pool: &PgPool) {
    ActorRepo::create(pool, &CreateActor::new("player", "player"))
        .await
        .unwrap();
    ActorRepo::create(pool, &CreateActor::new("wolf", "npc"))
        .await
        .unwrap();
}

fn skill(id: &str) -> SeedSkill {
    SeedSkill {
        id: id.to_string(),
        title: id.to_string(),
        tags: None,
        min_level: None,
        props: None,
    }
}

// ---------------------------------------------------------------------------
// Test: Status apply and refresh
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_defaults_and_refresh(pool: PgPool) {
    seed_actors(&pool).await;

    let status = StatusRepo::apply(&pool, &ApplyStatus::new("player", "poisoned"))
        .await
        .unwrap();
    assert_eq!(status.turns_left, 1);
    assert_eq!(status.stacks, 1);
    assert!(status.source_id.is_none());

    // Re-applying refreshes the same row instead of adding one.
    let refreshed = StatusRepo::apply(
        &pool,
        &ApplyStatus {
            source_id: Some("wolf".to_string()),
            ..ApplyStatus::new("player", "poisoned").lasting(3)
        },
    )
    .await
    .unwrap();
    assert_eq!(refreshed.turns_left, 3);
    assert_eq!(refreshed.source_id.as_deref(), Some("wolf"));

    let rows: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM actor_statuses WHERE actor_id = 'player' AND status_id = 'poisoned'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows.0, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_without_source_keeps_original(pool: PgPool) {
    seed_actors(&pool).await;

    StatusRepo::apply(
        &pool,
        &ApplyStatus {
            source_id: Some("wolf".to_string()),
            ..ApplyStatus::new("player", "poisoned").lasting(2)
        },
    )
    .await
    .unwrap();

    let refreshed = StatusRepo::apply(&pool, &ApplyStatus::new("player", "poisoned").lasting(5))
        .await
        .unwrap();
    assert_eq!(refreshed.source_id.as_deref(), Some("wolf"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_unknown_actor_rejected(pool: PgPool) {
    let err = StatusRepo::apply(&pool, &ApplyStatus::new("ghost", "poisoned"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::ForeignKeyViolation { .. });
}

// ---------------------------------------------------------------------------
// Test: Decay tick
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_decay_expires_and_reports(pool: PgPool) {
    seed_actors(&pool).await;

    StatusRepo::apply(&pool, &ApplyStatus::new("player", "burning").lasting(1))
        .await
        .unwrap();
    StatusRepo::apply(&pool, &ApplyStatus::new("player", "blessed").lasting(3))
        .await
        .unwrap();
    StatusRepo::apply(&pool, &ApplyStatus::new("wolf", "limping").lasting(1))
        .await
        .unwrap();

    let expired = StatusRepo::decay_all(&pool).await.unwrap();
    let mut pairs: Vec<(String, String)> = expired
        .into_iter()
        .map(|e| (e.actor_id, e.status_id))
        .collect();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            ("player".to_string(), "burning".to_string()),
            ("wolf".to_string(), "limping".to_string()),
        ]
    );

    let active = StatusRepo::list_active(&pool, "player").await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].status_id, "blessed");
    assert_eq!(active[0].turns_left, 2);

    // A second tick with nothing at zero reports no expiries.
    let expired = StatusRepo::decay_all(&pool).await.unwrap();
    assert!(expired.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_status(pool: PgPool) {
    seed_actors(&pool).await;
    StatusRepo::apply(&pool, &ApplyStatus::new("player", "poisoned").lasting(5))
        .await
        .unwrap();

    assert!(StatusRepo::remove(&pool, "player", "poisoned").await.unwrap());
    assert!(!StatusRepo::remove(&pool, "player", "poisoned").await.unwrap());
    assert!(StatusRepo::find(&pool, "player", "poisoned")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: Skills
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_learn_is_idempotent(pool: PgPool) {
    seed_actors(&pool).await;
    SkillRepo::seed(&pool, &skill("ignite")).await.unwrap();

    assert!(SkillRepo::learn(&pool, "player", "ignite").await.unwrap());
    assert!(!SkillRepo::learn(&pool, "player", "ignite").await.unwrap());
    assert!(SkillRepo::knows(&pool, "player", "ignite").await.unwrap());
    assert!(!SkillRepo::knows(&pool, "wolf", "ignite").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_learn_unknown_skill_rejected(pool: PgPool) {
    seed_actors(&pool).await;

    let err = SkillRepo::learn(&pool, "player", "fly").await.unwrap_err();
    assert_matches!(err, StoreError::ForeignKeyViolation { .. });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_for_actor_joins_catalog(pool: PgPool) {
    seed_actors(&pool).await;
    SkillRepo::seed(&pool, &skill("ignite")).await.unwrap();
    SkillRepo::seed(&pool, &skill("track")).await.unwrap();
    SkillRepo::learn(&pool, "player", "ignite").await.unwrap();
    SkillRepo::learn(&pool, "player", "track").await.unwrap();

    let learned = SkillRepo::list_for_actor(&pool, "player").await.unwrap();
    assert_eq!(learned.len(), 2);
    assert_eq!(learned[0].id, "ignite");

    assert!(SkillRepo::forget(&pool, "player", "track").await.unwrap());
    assert_eq!(SkillRepo::list_for_actor(&pool, "player").await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_actor_cascades_statuses_and_skills(pool: PgPool) {
    seed_actors(&pool).await;
    SkillRepo::seed(&pool, &skill("ignite")).await.unwrap();
    SkillRepo::learn(&pool, "player", "ignite").await.unwrap();
    StatusRepo::apply(&pool, &ApplyStatus::new("player", "poisoned").lasting(5))
        .await
        .unwrap();

    assert!(ActorRepo::delete(&pool, "player").await.unwrap());

    let rows: (i64,) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM actor_skills WHERE actor_id = 'player')
              + (SELECT COUNT(*) FROM actor_statuses WHERE actor_id = 'player')",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows.0, 0);
}
