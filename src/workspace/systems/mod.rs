// src/workspace/systems/mod.rs

pub mod canvas_edits;
pub mod grid_edits;
pub mod persistence;
pub mod records;
pub mod startup;
