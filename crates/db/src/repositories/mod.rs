//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Multi-row invariants (item moves) run
//! inside a single transaction; every mutation that can trip a constraint
//! surfaces it as a classified [`crate::StoreError`].

pub mod actor_repo;
pub mod container_repo;
pub mod fact_repo;
pub mod inventory_repo;
pub mod item_kind_repo;
pub mod item_repo;
pub mod location_repo;
pub mod memory_repo;
pub mod narrative_style_repo;
pub mod node_repo;
pub mod skill_repo;
pub mod status_repo;

pub use actor_repo::ActorRepo;
pub use container_repo::ContainerRepo;
pub use fact_repo::FactRepo;
pub use inventory_repo::InventoryRepo;
pub use item_kind_repo::ItemKindRepo;
pub use item_repo::ItemRepo;
pub use location_repo::LocationRepo;
pub use memory_repo::MemoryRepo;
pub use narrative_style_repo::NarrativeStyleRepo;
pub use node_repo::NodeRepo;
pub use skill_repo::SkillRepo;
pub use status_repo::StatusRepo;
