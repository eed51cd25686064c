//! Domain types shared across the Embermark world store.
//!
//! This crate is database-agnostic: identifier aliases, the polymorphic
//! [`location::ItemLocation`] type, and the narrative-style configuration
//! shape. Everything that talks SQL lives in `embermark-db`.

pub mod location;
pub mod narrative;
pub mod types;
