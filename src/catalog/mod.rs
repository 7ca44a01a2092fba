// src/catalog/mod.rs

pub mod compliance;
pub mod definitions;
pub mod events;
pub mod feeds;
pub mod filter;
pub mod mock_data;
pub mod plugin;
pub mod relationship_map;
pub mod resources;
pub mod systems;

pub use definitions::{CatalogEntry, CatalogKind, ALL_CATEGORIES};
pub use plugin::CatalogPlugin;
