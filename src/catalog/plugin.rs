// src/catalog/plugin.rs
use bevy::prelude::*;

use super::events::{FeedSyncCompleted, RequestFeedSync};
use super::resources::{CatalogState, FeedConfig};
use super::systems;

/// Catalog data and feed sync. Requires `TokioTasksPlugin` for the fetch
/// tasks and `WorkspacePlugin` for feedback events.
pub struct CatalogPlugin;

impl Plugin for CatalogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CatalogState>()
            .init_resource::<FeedConfig>()
            .add_event::<RequestFeedSync>()
            .add_event::<FeedSyncCompleted>();

        app.add_systems(
            Update,
            (systems::spawn_feed_syncs, systems::apply_feed_results).chain(),
        );

        info!("CatalogPlugin initialized.");
    }
}
