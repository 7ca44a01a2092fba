// src/ui/pages/home.rs
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::catalog::resources::CatalogState;
use crate::catalog::CatalogKind;
use crate::session::{CurrentSession, Role};
use crate::ui::pages::stat_card;
use crate::ui::{Page, UiState};
use crate::workspace::resources::WorkspaceIndex;

pub fn home_page(
    mut contexts: EguiContexts,
    mut ui_state: ResMut<UiState>,
    session: Res<CurrentSession>,
    index: Res<WorkspaceIndex>,
    catalogs: Res<CatalogState>,
) {
    let ctx = contexts.ctx_mut();
    let summary = catalogs.summary();

    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(current) = &session.0 {
            ui.heading(format!("Welcome, {}", current.username));
            if current.role == Role::SuperAdmin {
                egui::Frame::group(ui.style())
                    .fill(egui::Color32::from_rgb(60, 40, 90))
                    .show(ui, |ui| {
                        ui.colored_label(
                            egui::Color32::WHITE,
                            "Signed in with super-admin privileges.",
                        );
                    });
            }
        }
        ui.add_space(12.0);

        ui.horizontal_wrapped(|ui| {
            stat_card(ui, "Databases", index.databases.len().to_string());
            stat_card(ui, "Mappers", index.mappers.len().to_string());
            stat_card(ui, "Compliance", format!("{}%", summary.compliance_percent()));
            stat_card(ui, "Open vulnerabilities", summary.open_vulnerabilities.to_string());
        });
        ui.add_space(12.0);

        ui.label("Jump to:");
        ui.horizontal_wrapped(|ui| {
            for kind in [CatalogKind::Controls, CatalogKind::Threats, CatalogKind::Vulnerabilities] {
                if ui.button(kind.title()).clicked() {
                    ui_state.page = Page::Catalog(kind);
                }
            }
            if ui.button("Compliance").clicked() {
                ui_state.page = Page::Compliance;
            }
            if ui.button("Relationship Map").clicked() {
                ui_state.page = Page::RelationshipMap;
            }
        });
    });
}
