// src/ui/editors/mod.rs
pub mod database;
pub mod mapper;
