// src/catalog/systems.rs
use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;

use super::events::{FeedSyncCompleted, RequestFeedSync};
use super::feeds;
use super::resources::{CatalogState, FeedConfig};
use crate::workspace::events::OperationFeedback;

/// Spawns one background fetch per requested feed. A feed already in
/// flight is not fetched twice.
pub fn spawn_feed_syncs(
    mut events: EventReader<RequestFeedSync>,
    mut state: ResMut<CatalogState>,
    config: Res<FeedConfig>,
    runtime: Res<TokioTasksRuntime>,
) {
    for event in events.read() {
        let kind = event.kind;
        if !state.syncing.insert(kind) {
            debug!("Feeds: {} sync already running", kind);
            continue;
        }
        info!("Feeds: Spawning sync task for {}", kind);
        let endpoints = config.0.clone();

        runtime.spawn_background_task(move |mut ctx| async move {
            let result = feeds::fetch(kind, &endpoints).await.map_err(|e| e.to_string());
            ctx.run_on_main_thread(move |ctx| {
                ctx.world.send_event(FeedSyncCompleted { kind, result });
            })
            .await;
        });
    }
}

/// Replaces a catalog with fetched data; a failure keeps the current list.
pub fn apply_feed_results(
    mut events: EventReader<FeedSyncCompleted>,
    mut state: ResMut<CatalogState>,
    mut feedback: EventWriter<OperationFeedback>,
) {
    for event in events.read() {
        state.syncing.remove(&event.kind);
        match &event.result {
            Ok(payload) => {
                let (kind, count) = state.apply(payload.clone());
                info!("Feeds: {} replaced with {} entries", kind, count);
                feedback.write(OperationFeedback::info(format!(
                    "Data synced successfully: fetched {} {}.",
                    count, kind
                )));
            }
            Err(message) => {
                error!("Feeds: {} sync failed: {}", event.kind, message);
                feedback.write(OperationFeedback::error(format!(
                    "Sync failed: could not fetch {} ({}).",
                    event.kind, message
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::feeds::{FeedKind, FeedPayload, FetchedCatalog};
    use chrono::Utc;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<CatalogState>()
            .add_event::<FeedSyncCompleted>()
            .add_event::<OperationFeedback>()
            .add_systems(Update, apply_feed_results);
        app
    }

    #[test]
    fn failed_sync_keeps_current_list() {
        let mut app = app();
        app.world_mut().resource_mut::<CatalogState>().syncing.insert(FeedKind::Threats);
        app.world_mut().send_event(FeedSyncCompleted {
            kind: FeedKind::Threats,
            result: Err("connection refused".to_string()),
        });
        app.update();

        let state = app.world().resource::<CatalogState>();
        assert_eq!(state.threats.len(), 8);
        assert!(!state.is_syncing(FeedKind::Threats));
        assert!(!state.last_synced.contains_key(&FeedKind::Threats));
        let errors: Vec<_> = app
            .world()
            .resource::<Events<OperationFeedback>>()
            .iter_current_update_events()
            .filter(|f| f.is_error)
            .cloned()
            .collect();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn successful_sync_replaces_list() {
        let mut app = app();
        let fetched_at = Utc::now();
        app.world_mut().send_event(FeedSyncCompleted {
            kind: FeedKind::Vulnerabilities,
            result: Ok(FeedPayload {
                catalog: FetchedCatalog::Vulnerabilities(Vec::new()),
                fetched_at,
            }),
        });
        app.update();

        let state = app.world().resource::<CatalogState>();
        assert!(state.vulnerabilities.is_empty());
        assert_eq!(state.controls.len(), 8);
        assert_eq!(state.last_synced.get(&FeedKind::Vulnerabilities), Some(&fetched_at));
        assert_eq!(state.summary().open_vulnerabilities, 0);
    }
}
