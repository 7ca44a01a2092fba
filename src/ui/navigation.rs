// src/ui/navigation.rs
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::catalog::CatalogKind;
use crate::session::{CurrentSession, Session};
use crate::settings::AppSettings;
use crate::ui::popups::{show_delete_confirm_popup, show_rename_popup, RecordPopupState};
use crate::ui::{Page, UiFeedbackState, UiState};
use crate::workspace::events::{
    RequestCreateRecord, RequestDeleteRecord, RequestOpenRecord, RequestRenameRecord,
};
use crate::workspace::resources::{OpenDatabase, OpenMapper, WorkspaceIndex, WorkspaceStore};
use crate::workspace::RecordKind;

const CATALOG_PAGES: [CatalogKind; 4] = [
    CatalogKind::Controls,
    CatalogKind::Threats,
    CatalogKind::Vulnerabilities,
    CatalogKind::Assets,
];

#[derive(SystemParam)]
pub struct RecordRequests<'w> {
    pub create: EventWriter<'w, RequestCreateRecord>,
    pub open: EventWriter<'w, RequestOpenRecord>,
    pub rename: EventWriter<'w, RequestRenameRecord>,
    pub delete: EventWriter<'w, RequestDeleteRecord>,
}

/// Sidebar with the page switcher and record lists, plus the status bar.
#[allow(clippy::too_many_arguments)]
pub fn navigation_panel(
    mut contexts: EguiContexts,
    mut ui_state: ResMut<UiState>,
    mut popups: Local<RecordPopupState>,
    mut requests: RecordRequests,
    mut session: ResMut<CurrentSession>,
    mut store: ResMut<WorkspaceStore>,
    index: Res<WorkspaceIndex>,
    open_db: Res<OpenDatabase>,
    open_mapper: Res<OpenMapper>,
    ui_feedback: Res<UiFeedbackState>,
    settings: Res<AppSettings>,
) {
    let ctx = contexts.ctx_mut();

    show_rename_popup(ctx, &mut popups, &mut requests.rename);
    show_delete_confirm_popup(ctx, &mut popups, &mut requests.delete);

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            // Errors are always shown; other notices follow the setting.
            let visible = ui_feedback.is_error || settings.notifications;
            if visible && !ui_feedback.last_message.is_empty() {
                let color = if ui_feedback.is_error {
                    egui::Color32::RED
                } else {
                    ui.style().visuals.text_color()
                };
                ui.colored_label(color, &ui_feedback.last_message);
            }
            if store.degraded.is_some() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(egui::Color32::YELLOW, "In-memory workspace: changes are not saved to disk");
                });
            }
        });
    });

    let mut sign_out = false;

    egui::SidePanel::left("navigation")
        .resizable(false)
        .default_width(210.0)
        .show(ctx, |ui| {
            ui.heading("SecureIT");
            if let Some(current) = &session.0 {
                ui.label(format!("{} ({})", current.username, current.role));
            }
            ui.separator();

            ui.selectable_value(&mut ui_state.page, Page::Home, Page::Home.title());
            for kind in CATALOG_PAGES {
                let page = Page::Catalog(kind);
                ui.selectable_value(&mut ui_state.page, page, page.title());
            }
            ui.selectable_value(&mut ui_state.page, Page::Compliance, Page::Compliance.title());
            ui.selectable_value(
                &mut ui_state.page,
                Page::RelationshipMap,
                Page::RelationshipMap.title(),
            );
            ui.separator();

            egui::ScrollArea::vertical().auto_shrink([false, true]).show(ui, |ui| {
                record_section(
                    ui,
                    RecordKind::Database,
                    "Databases",
                    index.ids(RecordKind::Database),
                    open_db.id().filter(|_| ui_state.page == Page::Database),
                    &mut popups,
                    &mut requests,
                );
                record_section(
                    ui,
                    RecordKind::Mapper,
                    "Mappers",
                    index.ids(RecordKind::Mapper),
                    open_mapper.id().filter(|_| ui_state.page == Page::Mapper),
                    &mut popups,
                    &mut requests,
                );
            });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                if ui.button("Sign out").clicked() {
                    sign_out = true;
                }
                ui.selectable_value(&mut ui_state.page, Page::Settings, Page::Settings.title());
            });
        });

    if sign_out {
        if let Err(e) = Session::logout(&mut store.store) {
            warn!("Failed to clear the stored session: {}", e);
        }
        if let Some(previous) = session.0.take() {
            info!("'{}' signed out", previous.username);
        }
        ui_state.page = Page::Home;
    }
}

fn record_section(
    ui: &mut egui::Ui,
    kind: RecordKind,
    heading: &str,
    ids: &[String],
    active_id: Option<&str>,
    popups: &mut RecordPopupState,
    requests: &mut RecordRequests,
) {
    egui::CollapsingHeader::new(heading)
        .default_open(true)
        .show(ui, |ui| {
            if ui.button(format!("+ New {}", kind)).clicked() {
                requests.create.write(RequestCreateRecord { kind });
            }
            if ids.is_empty() {
                ui.weak(format!("No {}s yet", kind));
            }
            for id in ids {
                let resp = ui.selectable_label(active_id == Some(id.as_str()), id);
                if resp.clicked() {
                    requests.open.write(RequestOpenRecord { kind, id: id.clone() });
                }
                resp.context_menu(|menu_ui| {
                    if menu_ui.button("Rename").clicked() {
                        popups.start_rename(kind, id);
                        menu_ui.close_menu();
                    }
                    if menu_ui.button("Delete").clicked() {
                        popups.start_delete(kind, id);
                        menu_ui.close_menu();
                    }
                });
            }
        });
}
