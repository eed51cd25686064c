//! Integration tests for the item location engine:
//! - An item occupies exactly one mechanism after any move
//! - Hand rules (occupancy, two-handed wielding)
//! - Worn bag rules (container kinds only, one bag)
//! - Container grid rules (bounds, occupancy, self-containment)
//! - The partial unique indexes as a backstop against raw writes

use assert_matches::assert_matches;
use serde_json::json;
use sqlx::PgPool;

use embermark_core::location::{Hand, ItemLocation};
use embermark_core::types::ItemId;
use embermark_db::error::StoreError;
use embermark_db::models::actor::CreateActor;
use embermark_db::models::item::CreateItem;
use embermark_db::models::item_kind::{Handedness, SeedItemKind};
use embermark_db::models::node::SeedNode;
use embermark_db::repositories::{
    ActorRepo, ContainerRepo, InventoryRepo, ItemKindRepo, ItemRepo, LocationRepo, NodeRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_world(pool: &PgPool) {
    NodeRepo::seed(
        pool,
        &SeedNode {
            id: "glade".to_string(),
            title: "Glade".to_string(),
            biome: None,
            width: None,
            height: None,
            layout: None,
            exits: None,
        },
    )
    .await
    .unwrap();

    let mut player = CreateActor::new("player", "player");
    player.node_id = Some("glade".to_string());
    ActorRepo::create(pool, &player).await.unwrap();

    let mut rival = CreateActor::new("rival", "npc");
    rival.node_id = Some("glade".to_string());
    ActorRepo::create(pool, &rival).await.unwrap();

    let mut lighter = SeedItemKind::new("lighter", "Lighter");
    lighter.base_charges = Some(50);
    ItemKindRepo::seed(pool, &lighter).await.unwrap();

    let mut sword = SeedItemKind::new("greatsword", "Greatsword");
    sword.handedness = Some(Handedness::TwoHands);
    ItemKindRepo::seed(pool, &sword).await.unwrap();

    let mut bag = SeedItemKind::new("backpack", "Backpack");
    bag.grid_w = Some(4);
    bag.grid_h = Some(4);
    ItemKindRepo::seed(pool, &bag).await.unwrap();

    // Pouch is a container without a grid, flagged through props.
    let mut pouch = SeedItemKind::new("pouch", "Pouch");
    pouch.props = Some(json!({ "container": true }));
    ItemKindRepo::seed(pool, &pouch).await.unwrap();
}

async fn spawn(pool: &PgPool, kind: &str) -> ItemId {
    ItemRepo::create(pool, &CreateItem::of_kind(kind))
        .await
        .unwrap()
        .id
}

fn in_hand(actor: &str, hand: Hand) -> ItemLocation {
    ItemLocation::Hand {
        actor_id: actor.to_string(),
        hand,
    }
}

fn on_ground(node: &str) -> ItemLocation {
    ItemLocation::Node {
        node_id: node.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Test: Exclusivity across every mechanism
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_chain_keeps_one_location(pool: PgPool) {
    seed_world(&pool).await;
    let lighter = spawn(&pool, "lighter").await;
    let bag = spawn(&pool, "backpack").await;

    // A freshly spawned item is nowhere.
    assert_eq!(LocationRepo::locate(&pool, lighter).await.unwrap(), None);

    // ground -> left hand -> hidden -> backpack array -> bag grid -> ground
    let stops = [
        on_ground("glade"),
        in_hand("player", Hand::Left),
        ItemLocation::Hidden {
            actor_id: "player".to_string(),
        },
        ItemLocation::Backpack {
            actor_id: "player".to_string(),
        },
        ItemLocation::ContainerSlot {
            container_item_id: bag,
            x: 0,
            y: 0,
        },
        on_ground("glade"),
    ];
    for stop in &stops {
        LocationRepo::move_to(&pool, lighter, stop).await.unwrap();
        assert_eq!(
            LocationRepo::locate(&pool, lighter).await.unwrap().as_ref(),
            Some(stop)
        );
    }

    // After the round trip no inventory mechanism still references the item.
    let stale: (i64,) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM inventories
                 WHERE left_item = $1 OR right_item = $1 OR hidden_item = $1
                    OR equipped_bag = $1 OR $1 = ANY(backpack))
              + (SELECT COUNT(*) FROM carried_container_slots WHERE item_id = $1)",
    )
    .bind(lighter)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(stale.0, 0);

    let item = ItemRepo::find(&pool, lighter).await.unwrap().unwrap();
    assert_eq!(item.node_id.as_deref(), Some("glade"));
    assert!(item.owner_id.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_between_hands_of_same_actor(pool: PgPool) {
    seed_world(&pool).await;
    let lighter = spawn(&pool, "lighter").await;

    LocationRepo::move_to(&pool, lighter, &in_hand("player", Hand::Left))
        .await
        .unwrap();
    LocationRepo::move_to(&pool, lighter, &in_hand("player", Hand::Right))
        .await
        .unwrap();

    assert_eq!(
        LocationRepo::locate(&pool, lighter).await.unwrap(),
        Some(in_hand("player", Hand::Right))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_taking_an_item_moves_it_between_actors(pool: PgPool) {
    seed_world(&pool).await;
    let lighter = spawn(&pool, "lighter").await;

    LocationRepo::move_to(&pool, lighter, &in_hand("player", Hand::Left))
        .await
        .unwrap();
    LocationRepo::move_to(&pool, lighter, &in_hand("rival", Hand::Left))
        .await
        .unwrap();

    assert_eq!(
        LocationRepo::locate(&pool, lighter).await.unwrap(),
        Some(in_hand("rival", Hand::Left))
    );
    let player_inv = InventoryRepo::find(&pool, "player").await.unwrap().unwrap();
    assert!(player_inv.left_item.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_item_is_not_found(pool: PgPool) {
    seed_world(&pool).await;
    let ghost = uuid::Uuid::new_v4();

    let err = LocationRepo::move_to(&pool, ghost, &on_ground("glade"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::NotFound { entity: "item", .. });

    let err = LocationRepo::locate(&pool, ghost).await.unwrap_err();
    assert_matches!(err, StoreError::NotFound { entity: "item", .. });
}

// ---------------------------------------------------------------------------
// Test: Hand rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_occupied_hand_rejected(pool: PgPool) {
    seed_world(&pool).await;
    let first = spawn(&pool, "lighter").await;
    let second = spawn(&pool, "lighter").await;

    LocationRepo::move_to(&pool, first, &in_hand("player", Hand::Left))
        .await
        .unwrap();
    let err = LocationRepo::move_to(&pool, second, &in_hand("player", Hand::Left))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));

    // The other hand is still free.
    LocationRepo::move_to(&pool, second, &in_hand("player", Hand::Right))
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_two_handed_needs_both_hands_free(pool: PgPool) {
    seed_world(&pool).await;
    let lighter = spawn(&pool, "lighter").await;
    let sword = spawn(&pool, "greatsword").await;

    LocationRepo::move_to(&pool, lighter, &in_hand("player", Hand::Left))
        .await
        .unwrap();

    let err = LocationRepo::move_to(&pool, sword, &in_hand("player", Hand::Right))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));

    // Stow the lighter, then the sword fits.
    InventoryRepo::stash_backpack(&pool, "player", lighter)
        .await
        .unwrap();
    LocationRepo::move_to(&pool, sword, &in_hand("player", Hand::Right))
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_off_hand_while_wielding_two_handed(pool: PgPool) {
    seed_world(&pool).await;
    let lighter = spawn(&pool, "lighter").await;
    let sword = spawn(&pool, "greatsword").await;

    LocationRepo::move_to(&pool, sword, &in_hand("player", Hand::Right))
        .await
        .unwrap();
    let err = LocationRepo::move_to(&pool, lighter, &in_hand("player", Hand::Left))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));
}

// ---------------------------------------------------------------------------
// Test: Worn bag rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_containers_wearable_as_bag(pool: PgPool) {
    seed_world(&pool).await;
    let lighter = spawn(&pool, "lighter").await;
    let bag = spawn(&pool, "backpack").await;
    let pouch = spawn(&pool, "pouch").await;

    let err = InventoryRepo::equip_bag(&pool, "player", lighter)
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));

    InventoryRepo::equip_bag(&pool, "player", bag).await.unwrap();

    // One bag at a time, even a props-flagged container.
    let err = InventoryRepo::equip_bag(&pool, "player", pouch)
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));

    let taken_off = InventoryRepo::unequip_bag(&pool, "player").await.unwrap();
    assert_eq!(taken_off, bag);
    InventoryRepo::equip_bag(&pool, "player", pouch).await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: Container grid rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_grid_bounds_and_occupancy(pool: PgPool) {
    seed_world(&pool).await;
    let bag = spawn(&pool, "backpack").await;
    let first = spawn(&pool, "lighter").await;
    let second = spawn(&pool, "lighter").await;

    let err = ContainerRepo::put(&pool, bag, first, 4, 0).await.unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));
    let err = ContainerRepo::put(&pool, bag, first, 0, -1).await.unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));

    ContainerRepo::put(&pool, bag, first, 1, 2).await.unwrap();
    let err = ContainerRepo::put(&pool, bag, second, 1, 2).await.unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));

    // put_anywhere takes the first free cell in row-major order.
    let (x, y) = ContainerRepo::put_anywhere(&pool, bag, second).await.unwrap();
    assert_eq!((x, y), (0, 0));

    let contents = ContainerRepo::contents(&pool, bag).await.unwrap();
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0].item_id, second);
    assert_eq!(contents[0].title, "Lighter");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_container_cannot_contain_itself(pool: PgPool) {
    seed_world(&pool).await;
    let bag = spawn(&pool, "backpack").await;

    let err = ContainerRepo::put(&pool, bag, bag, 0, 0).await.unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_nested_containers_cannot_form_cycle(pool: PgPool) {
    seed_world(&pool).await;
    let mut sack_kind = SeedItemKind::new("sack", "Burlap Sack");
    sack_kind.grid_w = Some(2);
    sack_kind.grid_h = Some(3);
    ItemKindRepo::seed(&pool, &sack_kind).await.unwrap();

    let outer = spawn(&pool, "backpack").await;
    let inner = spawn(&pool, "sack").await;

    // Nesting one level is fine.
    ContainerRepo::put(&pool, outer, inner, 0, 0).await.unwrap();

    // Closing the loop is not.
    let err = ContainerRepo::put(&pool, inner, outer, 0, 0).await.unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));

    // Same through a deeper chain.
    let middle = spawn(&pool, "sack").await;
    ContainerRepo::put(&pool, inner, middle, 0, 0).await.unwrap();
    let err = ContainerRepo::put(&pool, middle, outer, 0, 0).await.unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_gridless_container_takes_no_slots(pool: PgPool) {
    seed_world(&pool).await;
    let pouch = spawn(&pool, "pouch").await;
    let lighter = spawn(&pool, "lighter").await;

    // Wearable as a bag, but positional storage needs a grid.
    let err = ContainerRepo::put(&pool, pouch, lighter, 0, 0).await.unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_take_from_container_into_backpack(pool: PgPool) {
    seed_world(&pool).await;
    let bag = spawn(&pool, "backpack").await;
    let lighter = spawn(&pool, "lighter").await;

    InventoryRepo::equip_bag(&pool, "player", bag).await.unwrap();
    ContainerRepo::put(&pool, bag, lighter, 0, 0).await.unwrap();

    ContainerRepo::take(&pool, "player", lighter).await.unwrap();
    assert_eq!(
        LocationRepo::locate(&pool, lighter).await.unwrap(),
        Some(ItemLocation::Backpack {
            actor_id: "player".to_string()
        })
    );
    assert!(ContainerRepo::contents(&pool, bag).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: Inventory verbs and views
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unequip_hand_goes_to_backpack(pool: PgPool) {
    seed_world(&pool).await;
    let lighter = spawn(&pool, "lighter").await;

    InventoryRepo::equip_hand(&pool, "player", Hand::Left, lighter)
        .await
        .unwrap();
    let stowed = InventoryRepo::unequip_hand(&pool, "player", Hand::Left)
        .await
        .unwrap();
    assert_eq!(stowed, lighter);

    let err = InventoryRepo::unequip_hand(&pool, "player", Hand::Left)
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::InvalidLocation(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inventory_view_resolves_titles(pool: PgPool) {
    seed_world(&pool).await;
    let lighter = spawn(&pool, "lighter").await;
    let sword = spawn(&pool, "greatsword").await;
    let bag = spawn(&pool, "backpack").await;

    InventoryRepo::equip_hand(&pool, "player", Hand::Left, lighter)
        .await
        .unwrap();
    InventoryRepo::equip_bag(&pool, "player", bag).await.unwrap();
    InventoryRepo::stash_backpack(&pool, "player", sword)
        .await
        .unwrap();

    let view = InventoryRepo::fetch_view(&pool, "player").await.unwrap();
    assert_eq!(view.left.as_ref().map(|i| i.title.as_str()), Some("Lighter"));
    assert!(view.right.is_none());
    assert_eq!(
        view.equipped_bag.as_ref().map(|i| i.title.as_str()),
        Some("Backpack")
    );
    assert_eq!(view.backpack.len(), 1);
    assert_eq!(view.backpack[0].title, "Greatsword");

    // An actor with no inventory row reads as empty.
    let view = InventoryRepo::fetch_view(&pool, "rival").await.unwrap();
    assert!(view.left.is_none() && view.backpack.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_item_scrubs_inventory(pool: PgPool) {
    seed_world(&pool).await;
    let lighter = spawn(&pool, "lighter").await;

    InventoryRepo::stash_backpack(&pool, "player", lighter)
        .await
        .unwrap();
    assert!(ItemRepo::delete(&pool, lighter).await.unwrap());

    let inv = InventoryRepo::find(&pool, "player").await.unwrap().unwrap();
    assert!(inv.backpack.is_empty());
}

// ---------------------------------------------------------------------------
// Test: Unique indexes backstop raw writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_index_rejects_double_reference(pool: PgPool) {
    seed_world(&pool).await;
    let lighter = spawn(&pool, "lighter").await;

    LocationRepo::move_to(&pool, lighter, &in_hand("player", Hand::Left))
        .await
        .unwrap();

    // A raw write putting the same item in a second inventory must hit the
    // partial unique index.
    let err = sqlx::query(
        "INSERT INTO inventories (actor_id, left_item) VALUES ('rival', $1)",
    )
    .bind(lighter)
    .execute(&pool)
    .await
    .unwrap_err();
    let err = embermark_db::error::StoreError::from(err);
    assert_matches!(err, StoreError::UniqueViolation { .. });
}
