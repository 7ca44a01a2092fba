// src/ui/pages/settings.rs
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::catalog::resources::FeedConfig;
use crate::settings::io::save_settings_to_file;
use crate::settings::AppSettings;
use crate::workspace::events::OperationFeedback;
use crate::workspace::resources::{WorkspaceOptions, WorkspaceStore};

pub fn settings_page(
    mut contexts: EguiContexts,
    mut settings: ResMut<AppSettings>,
    mut options: ResMut<WorkspaceOptions>,
    mut feed_config: ResMut<FeedConfig>,
    store: Res<WorkspaceStore>,
    mut feedback: EventWriter<OperationFeedback>,
) {
    let ctx = contexts.ctx_mut();
    let mut draft = settings.clone();
    let mut save_clicked = false;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Settings");
        ui.separator();

        ui.strong("Workspace");
        ui.checkbox(&mut draft.auto_save, "Save records after every change");
        ui.checkbox(&mut draft.show_grid_lines, "Show grid lines on mapper canvases");
        ui.checkbox(&mut draft.notifications, "Show informational notices");
        ui.add_space(8.0);

        ui.strong("Feeds");
        egui::Grid::new("feed_settings").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
            ui.label("NVD window (days):");
            ui.add(egui::DragValue::new(&mut draft.feeds.nvd_window_days).range(1..=120));
            ui.end_row();
            ui.label("NVD results:");
            ui.add(egui::DragValue::new(&mut draft.feeds.nvd_results).range(1..=2000));
            ui.end_row();
        });
        ui.add_space(8.0);

        ui.strong("Storage");
        ui.label(format!("Workspace store: {}", store.location));
        if let Some(reason) = &store.degraded {
            ui.colored_label(egui::Color32::YELLOW, format!("Running in memory: {}", reason));
        }
        ui.add_space(12.0);

        if ui.button("Save settings").clicked() {
            save_clicked = true;
        }
    });

    if draft != *settings {
        options.auto_save = draft.auto_save;
        feed_config.0 = draft.feed_endpoints();
        *settings = draft;
    }

    if save_clicked {
        match save_settings_to_file(&settings) {
            Ok(()) => {
                feedback.write(OperationFeedback::info("Settings saved."));
            }
            Err(e) => {
                error!("Failed to save settings: {}", e);
                feedback.write(OperationFeedback::error(format!("Failed to save settings: {}", e)));
            }
        }
    }
}
