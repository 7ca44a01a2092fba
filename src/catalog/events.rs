// src/catalog/events.rs
use bevy::prelude::Event;

use super::feeds::{FeedKind, FeedPayload};

/// Sent by the "Sync" buttons of the catalog pages.
#[derive(Event, Debug, Clone)]
pub struct RequestFeedSync {
    pub kind: FeedKind,
}

/// Sent from the background task back to the main thread.
#[derive(Event, Debug, Clone)]
pub struct FeedSyncCompleted {
    pub kind: FeedKind,
    pub result: Result<FeedPayload, String>,
}
