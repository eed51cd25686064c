//! Demo world fixtures.
//!
//! Idempotent: every insert is `ON CONFLICT DO NOTHING`, so the seeder can
//! run on every startup of a dev environment.

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::actor::CreateActor;
use crate::models::item::CreateItem;
use crate::models::item_kind::{Handedness, SeedItemKind};
use crate::models::narrative_style::SeedNarrativeStyle;
use crate::models::node::SeedNode;
use crate::models::skill::SeedSkill;
use crate::repositories::{
    ActorRepo, InventoryRepo, ItemKindRepo, ItemRepo, NarrativeStyleRepo, NodeRepo, SkillRepo,
};

// Fixed instance ids so ground items can be re-seeded without duplicating.
const LIGHTER_ID: Uuid = Uuid::from_u128(0xe3b0_c442_98fc_1c14_9afb_f4c8_996f_b924);
const BACKPACK_ID: Uuid = Uuid::from_u128(0x6b86_b273_ff34_fce1_9d6b_804e_ff5a_3f57);

/// Seed the demo world: a forest clearing, a player, a handful of item kinds
/// and catalog skills, and the stock narration styles.
///
/// Every step is insert-if-absent on its own, so an interrupted run is
/// completed by the next one instead of leaving a half-seeded world.
pub async fn seed_demo_world(pool: &PgPool) -> StoreResult<()> {
    seed_styles(pool).await?;
    seed_item_kinds(pool).await?;
    seed_skills(pool).await?;

    NodeRepo::seed(
        pool,
        &SeedNode {
            id: "forest_clearing".into(),
            title: "Forest Clearing".into(),
            biome: None,
            width: None,
            height: None,
            layout: None,
            exits: Some(json!([
                { "id": "north_path", "x": 8, "y": 0, "to": "deep_forest" },
            ])),
        },
    )
    .await?;

    if ActorRepo::find(pool, "player").await?.is_none() {
        let mut player = CreateActor::new("player", "player");
        player.node_id = Some("forest_clearing".into());
        player.x = Some(8);
        player.y = Some(8);
        ActorRepo::create(pool, &player).await?;
    }
    InventoryRepo::ensure(pool, "player").await?;

    // Starting gear on the ground next to the player.
    if ItemRepo::find(pool, LIGHTER_ID).await?.is_none() {
        let mut lighter = CreateItem::of_kind("lighter");
        lighter.id = Some(LIGHTER_ID);
        lighter.node_id = Some("forest_clearing".into());
        ItemRepo::create(pool, &lighter).await?;
    }
    if ItemRepo::find(pool, BACKPACK_ID).await?.is_none() {
        let mut bag = CreateItem::of_kind("backpack");
        bag.id = Some(BACKPACK_ID);
        bag.node_id = Some("forest_clearing".into());
        ItemRepo::create(pool, &bag).await?;
    }

    SkillRepo::learn(pool, "player", "ignite").await?;

    tracing::info!("seeded demo world");
    Ok(())
}

async fn seed_styles(pool: &PgPool) -> StoreResult<()> {
    NarrativeStyleRepo::seed(
        pool,
        &SeedNarrativeStyle {
            id: "default".into(),
            title: "Default".into(),
            config: None,
        },
    )
    .await?;
    NarrativeStyleRepo::seed(
        pool,
        &SeedNarrativeStyle {
            id: "status".into(),
            title: "Status Report".into(),
            config: Some(json!({
                "tone": "urgent",
                "max_chars": 180,
                "persona": "battle_observer",
            })),
        },
    )
    .await?;
    Ok(())
}

async fn seed_item_kinds(pool: &PgPool) -> StoreResult<()> {
    let mut lighter = SeedItemKind::new("lighter", "Lighter");
    lighter.base_charges = Some(50);
    lighter.props = Some(json!({ "ignite": true }));
    ItemKindRepo::seed(pool, &lighter).await?;

    let mut deodorant = SeedItemKind::new("deodorant", "Deodorant Spray");
    deodorant.base_charges = Some(20);
    deodorant.props = Some(json!({ "flammable": true }));
    ItemKindRepo::seed(pool, &deodorant).await?;

    let mut bottle = SeedItemKind::new("water_bottle", "Water Bottle");
    bottle.base_charges = Some(3);
    ItemKindRepo::seed(pool, &bottle).await?;

    let mut greatsword = SeedItemKind::new("greatsword", "Greatsword");
    greatsword.handedness = Some(Handedness::TwoHands);
    greatsword.base_durability = Some(100);
    ItemKindRepo::seed(pool, &greatsword).await?;

    let mut backpack = SeedItemKind::new("backpack", "Backpack");
    backpack.grid_w = Some(4);
    backpack.grid_h = Some(4);
    backpack.max_weight_g = Some(8000);
    ItemKindRepo::seed(pool, &backpack).await?;

    let mut sack = SeedItemKind::new("sack", "Burlap Sack");
    sack.grid_w = Some(2);
    sack.grid_h = Some(3);
    ItemKindRepo::seed(pool, &sack).await?;

    Ok(())
}

async fn seed_skills(pool: &PgPool) -> StoreResult<()> {
    SkillRepo::seed(
        pool,
        &SeedSkill {
            id: "ignite".into(),
            title: "Ignite".into(),
            tags: Some(vec!["fire".into(), "utility".into()]),
            min_level: None,
            props: Some(json!({ "requires_item": "lighter" })),
        },
    )
    .await?;

    SkillRepo::seed(
        pool,
        &SeedSkill {
            id: "track".into(),
            title: "Track Prey".into(),
            tags: Some(vec!["survival".into()]),
            min_level: Some(2),
            props: None,
        },
    )
    .await?;

    Ok(())
}
