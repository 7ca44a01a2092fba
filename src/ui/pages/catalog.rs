// src/ui/pages/catalog.rs
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use egui_extras::{Column, TableBuilder};

use crate::catalog::definitions::{Asset, Control, Severity, Threat, Vulnerability};
use crate::catalog::events::RequestFeedSync;
use crate::catalog::feeds::FeedKind;
use crate::catalog::filter::CatalogFilter;
use crate::catalog::resources::CatalogState;
use crate::catalog::{CatalogEntry, CatalogKind};
use crate::ui::pages::severity_color;
use crate::ui::{CatalogViewState, Page, UiState};
use crate::workspace::events::OperationFeedback;

/// Table layout of a catalog page.
pub(crate) trait CatalogRow: CatalogEntry {
    const HEADERS: &'static [&'static str];

    fn row_cells(&self) -> Vec<String>;

    /// Rating highlighted in the table, when the entry has one.
    fn rating(&self) -> Option<Severity> {
        None
    }
}

impl CatalogRow for Control {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Framework", "Category", "Implemented"];

    fn row_cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.framework.clone(),
            self.category.clone(),
            if self.implemented { "Yes" } else { "No" }.to_string(),
        ]
    }
}

impl CatalogRow for Threat {
    const HEADERS: &'static [&'static str] = &["MITRE ID", "Technique", "Tactic", "Severity"];

    fn row_cells(&self) -> Vec<String> {
        vec![
            self.mitre_id.clone(),
            self.technique.clone(),
            self.tactic.clone(),
            self.severity.as_str().to_string(),
        ]
    }

    fn rating(&self) -> Option<Severity> {
        Some(self.severity)
    }
}

impl CatalogRow for Vulnerability {
    const HEADERS: &'static [&'static str] = &["CVE ID", "Affected Product", "CVSS", "Severity", "Status"];

    fn row_cells(&self) -> Vec<String> {
        vec![
            self.cve_id.clone(),
            self.affected_product.clone(),
            format!("{:.1}", self.cvss_score),
            self.severity.as_str().to_string(),
            self.status.as_str().to_string(),
        ]
    }

    fn rating(&self) -> Option<Severity> {
        Some(self.severity)
    }
}

impl CatalogRow for Asset {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Type", "Owner", "Criticality", "Status"];

    fn row_cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.asset_type.as_str().to_string(),
            self.owner.clone(),
            self.criticality.as_str().to_string(),
            self.status.as_str().to_string(),
        ]
    }

    fn rating(&self) -> Option<Severity> {
        Some(self.criticality)
    }
}

pub fn catalog_page(
    mut contexts: EguiContexts,
    mut ui_state: ResMut<UiState>,
    catalogs: Res<CatalogState>,
    mut sync_writer: EventWriter<RequestFeedSync>,
    mut feedback: EventWriter<OperationFeedback>,
) {
    let Page::Catalog(kind) = ui_state.page else {
        return;
    };
    let ctx = contexts.ctx_mut();
    let view = ui_state.catalog_view(kind);

    match kind {
        CatalogKind::Controls => {
            show_catalog(ctx, &catalogs, &catalogs.controls, view, &mut sync_writer, &mut feedback)
        }
        CatalogKind::Threats => {
            show_catalog(ctx, &catalogs, &catalogs.threats, view, &mut sync_writer, &mut feedback)
        }
        CatalogKind::Vulnerabilities => show_catalog(
            ctx,
            &catalogs,
            &catalogs.vulnerabilities,
            view,
            &mut sync_writer,
            &mut feedback,
        ),
        CatalogKind::Assets => {
            show_catalog(ctx, &catalogs, &catalogs.assets, view, &mut sync_writer, &mut feedback)
        }
    }
}

fn show_catalog<T: CatalogRow>(
    ctx: &egui::Context,
    catalogs: &CatalogState,
    items: &[T],
    view: &mut CatalogViewState,
    sync_writer: &mut EventWriter<RequestFeedSync>,
    feedback: &mut EventWriter<OperationFeedback>,
) {
    if let Some(selected) = view.selected.clone() {
        match items.iter().find(|entry| entry.entry_id() == selected) {
            Some(entry) => {
                if show_detail_panel(ctx, entry, feedback) {
                    view.selected = None;
                }
            }
            // Gone after a sync replaced the list.
            None => view.selected = None,
        }
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        catalog_header(ui, T::KIND, catalogs, sync_writer);
        ui.separator();
        filter_bar::<T>(ui, &mut view.filter);

        let indices = view.filter.matching_indices(items);
        ui.weak(format!("Showing {} of {}", indices.len(), items.len()));
        ui.separator();

        if indices.is_empty() {
            ui.label("No entries match the current filter.");
            return;
        }
        catalog_table(ui, items, &indices, &mut view.selected);
    });
}

fn catalog_header(
    ui: &mut egui::Ui,
    kind: CatalogKind,
    catalogs: &CatalogState,
    sync_writer: &mut EventWriter<RequestFeedSync>,
) {
    ui.horizontal(|ui| {
        ui.heading(kind.title());
        let Some(feed) = FeedKind::for_catalog(kind) else {
            return;
        };
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if catalogs.is_syncing(feed) {
                ui.spinner();
                ui.label("Syncing...");
            } else if ui.button("Sync").on_hover_text("Fetch the latest entries from the public feed").clicked() {
                sync_writer.write(RequestFeedSync { kind: feed });
            }
            match catalogs.last_synced.get(&feed) {
                Some(at) => ui.weak(format!("Last synced {}", at.format("%Y-%m-%d %H:%M UTC"))),
                None => ui.weak("Sample data"),
            };
        });
    });
}

fn filter_bar<T: CatalogRow>(ui: &mut egui::Ui, filter: &mut CatalogFilter) {
    ui.horizontal(|ui| {
        ui.label("Search:");
        ui.add(
            egui::TextEdit::singleline(&mut filter.query)
                .hint_text("Type to filter")
                .desired_width(220.0),
        );
        egui::ComboBox::from_id_salt(("catalog_category", T::KIND.to_string()))
            .selected_text(filter.category.clone())
            .show_ui(ui, |ui| {
                for category in T::CATEGORIES {
                    ui.selectable_value(&mut filter.category, category.to_string(), *category);
                }
            });
        if filter.is_active() && ui.button("Clear").clicked() {
            *filter = CatalogFilter::default();
        }
    });
}

fn catalog_table<T: CatalogRow>(
    ui: &mut egui::Ui,
    items: &[T],
    indices: &[usize],
    selected: &mut Option<String>,
) {
    let row_height = ui.text_style_height(&egui::TextStyle::Body) + ui.style().spacing.item_spacing.y;
    let column_count = T::HEADERS.len();

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(egui::Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .min_scrolled_height(0.0);
    for i in 0..column_count {
        table = if i + 1 == column_count {
            table.column(Column::remainder())
        } else {
            table.column(Column::initial(140.0).at_least(60.0).resizable(true).clip(true))
        };
    }

    table
        .header(20.0, |mut header| {
            for title in T::HEADERS {
                header.col(|ui| {
                    ui.strong(*title);
                });
            }
        })
        .body(|body| {
            body.rows(row_height, indices.len(), |mut row| {
                let entry = &items[indices[row.index()]];
                row.set_selected(selected.as_deref() == Some(entry.entry_id()));
                let rating = entry.rating().map(|r| (r.as_str(), severity_color(r)));
                for cell in entry.row_cells() {
                    row.col(|ui| match rating {
                        Some((label, color)) if label == cell => {
                            ui.colored_label(color, cell);
                        }
                        _ => {
                            ui.label(cell);
                        }
                    });
                }
                if row.response().clicked() {
                    *selected = Some(entry.entry_id().to_string());
                }
            });
        });
}

/// Field list of one entry in a right-hand panel. Returns true when closed.
pub(crate) fn show_detail_panel<T: CatalogEntry>(
    ctx: &egui::Context,
    entry: &T,
    feedback: &mut EventWriter<OperationFeedback>,
) -> bool {
    let mut close = false;
    egui::SidePanel::right("entry_detail")
        .resizable(true)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(entry.title());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
            });
            ui.separator();
            egui::Grid::new("entry_detail_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (label, value) in entry.detail_fields() {
                        ui.strong(label);
                        ui.add(egui::Label::new(value).wrap());
                        ui.end_row();
                    }
                });
            if let Some(url) = entry.reference_url() {
                ui.add_space(8.0);
                if ui.button("Open reference").on_hover_text(&url).clicked() {
                    if let Err(e) = open::that(&url) {
                        warn!("Failed to open '{}': {}", url, e);
                        feedback.write(OperationFeedback::error(format!("Could not open {}: {}", url, e)));
                    }
                }
            }
        });
    close
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock_data;

    #[test]
    fn rows_line_up_with_headers() {
        for control in mock_data::controls() {
            assert_eq!(control.row_cells().len(), Control::HEADERS.len());
        }
        for threat in mock_data::threats() {
            assert_eq!(threat.row_cells().len(), Threat::HEADERS.len());
        }
        for vuln in mock_data::vulnerabilities() {
            assert_eq!(vuln.row_cells().len(), Vulnerability::HEADERS.len());
        }
        for asset in mock_data::assets() {
            assert_eq!(asset.row_cells().len(), Asset::HEADERS.len());
        }
    }

    #[test]
    fn rated_cell_is_present_in_row() {
        let vuln = &mock_data::vulnerabilities()[0];
        let label = vuln.rating().map(|r| r.as_str()).unwrap();
        assert!(vuln.row_cells().iter().any(|c| c == label));
        assert!(mock_data::controls()[0].rating().is_none());
    }
}
