//! Entity model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create/seed DTO for inserts
//! - Aggregate view structs where a read returns joined shapes

pub mod actor;
pub mod container;
pub mod fact;
pub mod inventory;
pub mod item;
pub mod item_kind;
pub mod memory;
pub mod narrative_style;
pub mod node;
pub mod skill;
pub mod status;
