// src/workspace/mod.rs

pub mod canvas;
pub mod column_label;
pub mod error;
pub mod events;
pub mod grid;
pub mod ids;
pub mod plugin;
pub mod resources;
pub mod store;
pub mod systems;
pub mod transfer;

pub use error::{RecordKind, WorkspaceError, WorkspaceResult};
pub use plugin::{StoreLocation, WorkspacePlugin};
