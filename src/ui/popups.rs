// src/ui/popups.rs
use bevy::prelude::*;
use bevy_egui::egui;

use crate::workspace::events::{RequestDeleteRecord, RequestRenameRecord};
use crate::workspace::RecordKind;

#[derive(Default)]
pub struct RecordPopupState {
    pub rename_target: Option<(RecordKind, String)>,
    pub new_id_input: String,
    pub delete_target: Option<(RecordKind, String)>,
}

impl RecordPopupState {
    pub fn start_rename(&mut self, kind: RecordKind, id: &str) {
        self.rename_target = Some((kind, id.to_string()));
        self.new_id_input = id.to_string();
    }

    pub fn start_delete(&mut self, kind: RecordKind, id: &str) {
        self.delete_target = Some((kind, id.to_string()));
    }
}

pub fn show_rename_popup(
    ctx: &egui::Context,
    state: &mut RecordPopupState,
    rename_event_writer: &mut EventWriter<RequestRenameRecord>,
) {
    let Some((kind, old_id)) = state.rename_target.clone() else {
        return;
    };

    let mut open = true;
    let mut cancel_clicked = false;
    let mut trigger_rename = false;

    egui::Window::new(format!("Rename {}", kind))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(format!("Renaming {} '{}'", kind, old_id));
            ui.separator();
            ui.horizontal(|ui| {
                ui.label("New id:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut state.new_id_input)
                        .desired_width(180.0)
                        .lock_focus(true),
                );
                if response.lost_focus()
                    && ui.input(|i| i.key_pressed(egui::Key::Enter))
                    && !state.new_id_input.trim().is_empty()
                {
                    trigger_rename = true;
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!state.new_id_input.trim().is_empty(), egui::Button::new("Rename"))
                    .clicked()
                {
                    trigger_rename = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel_clicked = true;
                }
            });
        });

    if trigger_rename {
        rename_event_writer.write(RequestRenameRecord {
            kind,
            old_id,
            new_id: state.new_id_input.trim().to_string(),
        });
    }
    if trigger_rename || cancel_clicked || !open {
        state.rename_target = None;
        state.new_id_input.clear();
    }
}

pub fn show_delete_confirm_popup(
    ctx: &egui::Context,
    state: &mut RecordPopupState,
    delete_event_writer: &mut EventWriter<RequestDeleteRecord>,
) {
    let Some((kind, id)) = state.delete_target.clone() else {
        return;
    };

    let mut open = true;
    let mut confirmed = false;
    let mut cancel_clicked = false;

    egui::Window::new(format!("Delete {}", kind))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(format!("Delete {} '{}'?", kind, id));
            ui.colored_label(egui::Color32::YELLOW, "This cannot be undone.");
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    confirmed = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel_clicked = true;
                }
            });
        });

    if confirmed {
        delete_event_writer.write(RequestDeleteRecord { kind, id });
    }
    if confirmed || cancel_clicked || !open {
        state.delete_target = None;
    }
}
