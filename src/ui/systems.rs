// src/ui/systems.rs
use bevy::prelude::*;

use crate::session::{CurrentSession, Session};
use crate::ui::{Page, UiFeedbackState, UiState};
use crate::workspace::events::{OperationFeedback, RecordOpened};
use crate::workspace::resources::WorkspaceStore;
use crate::workspace::RecordKind;

pub fn handle_ui_feedback(
    mut feedback_events: EventReader<OperationFeedback>,
    mut ui_feedback_state: ResMut<UiFeedbackState>,
) {
    let mut last_info = None;
    let mut last_error = None;
    for event in feedback_events.read() {
        if event.is_error {
            last_error = Some(event.message.clone());
        } else {
            last_info = Some(event.message.clone());
        }
    }
    // An error outranks any info written in the same frame.
    let shown = last_error.map(|msg| (msg, true)).or(last_info.map(|msg| (msg, false)));
    if let Some((msg, is_error)) = shown {
        ui_feedback_state.last_message = msg;
        ui_feedback_state.is_error = is_error;
        if is_error {
            warn!("UI Feedback (Error): {}", ui_feedback_state.last_message);
        } else {
            info!("UI Feedback: {}", ui_feedback_state.last_message);
        }
    }
}

/// Switches to the editor page of a record that was just opened.
pub fn follow_opened_records(mut opened: EventReader<RecordOpened>, mut ui_state: ResMut<UiState>) {
    if let Some(event) = opened.read().last() {
        ui_state.page = match event.kind {
            RecordKind::Database => Page::Database,
            RecordKind::Mapper => Page::Mapper,
        };
        debug!("Showing {} '{}'", event.kind, event.id);
    }
}

/// Picks up the user signed in during a previous run.
pub fn restore_session(store: Res<WorkspaceStore>, mut session: ResMut<CurrentSession>) {
    match Session::restore(&store.store) {
        Ok(Some(restored)) => {
            info!("Restored session for '{}' ({})", restored.username, restored.role);
            session.0 = Some(restored);
        }
        Ok(None) => {}
        Err(e) => warn!("Could not restore session: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<UiFeedbackState>()
            .init_resource::<UiState>()
            .add_event::<OperationFeedback>()
            .add_event::<RecordOpened>()
            .add_systems(Update, (handle_ui_feedback, follow_opened_records));
        app
    }

    #[test]
    fn error_outranks_earlier_info() {
        let mut app = app();
        app.world_mut().send_event(OperationFeedback::info("Sent db-1:A1 to mapper map-1."));
        app.world_mut().send_event(OperationFeedback::error("Could not open mapper map-1"));
        app.update();

        let state = app.world().resource::<UiFeedbackState>();
        assert_eq!(state.last_message, "Could not open mapper map-1");
        assert!(state.is_error);
    }

    #[test]
    fn last_error_is_kept() {
        let mut app = app();
        app.world_mut().send_event(OperationFeedback::error("a"));
        app.world_mut().send_event(OperationFeedback::info("saved"));
        app.world_mut().send_event(OperationFeedback::error("b"));
        app.update();

        let state = app.world().resource::<UiFeedbackState>();
        assert_eq!(state.last_message, "b");
        assert!(state.is_error);
    }

    #[test]
    fn last_info_is_kept_without_errors() {
        let mut app = app();
        app.world_mut().send_event(OperationFeedback::info("opened"));
        app.world_mut().send_event(OperationFeedback::info("saved"));
        app.update();

        let state = app.world().resource::<UiFeedbackState>();
        assert_eq!(state.last_message, "saved");
        assert!(!state.is_error);
    }

    #[test]
    fn opened_record_switches_page() {
        let mut app = app();
        app.world_mut().send_event(RecordOpened {
            kind: RecordKind::Mapper,
            id: "map-1".to_string(),
        });
        app.update();
        assert_eq!(app.world().resource::<UiState>().page, Page::Mapper);
    }
}
