// src/ui/editors/database.rs
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use egui_extras::{Column, TableBuilder};

use crate::workspace::column_label::column_label;
use crate::workspace::events::{
    GridAxis, RequestGrowGrid, RequestSaveRecord, RequestSendCellToMapper, UpdateCellEvent,
};
use crate::workspace::grid::DatabaseGrid;
use crate::workspace::resources::{OpenDatabase, WorkspaceIndex, WorkspaceOptions};
use crate::workspace::RecordKind;

#[derive(SystemParam)]
pub struct GridRequests<'w> {
    pub update_cell: EventWriter<'w, UpdateCellEvent>,
    pub grow: EventWriter<'w, RequestGrowGrid>,
    pub send: EventWriter<'w, RequestSendCellToMapper>,
    pub save: EventWriter<'w, RequestSaveRecord>,
}

pub fn database_page(
    mut contexts: EguiContexts,
    open_db: Res<OpenDatabase>,
    index: Res<WorkspaceIndex>,
    options: Res<WorkspaceOptions>,
    mut requests: GridRequests,
) {
    let ctx = contexts.ctx_mut();

    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(grid) = open_db.grid.as_ref() else {
            ui.heading("Database");
            ui.label("Select a database in the sidebar or create a new one.");
            return;
        };

        ui.horizontal(|ui| {
            ui.heading(format!("Database: {}", grid.id()));
            ui.weak(format!(
                "{} x {}, {} filled",
                grid.row_count(),
                grid.column_count(),
                grid.filled_count()
            ));
        });
        ui.horizontal(|ui| {
            if ui.button("Add row").clicked() {
                requests.grow.write(RequestGrowGrid { axis: GridAxis::Rows });
            }
            if ui.button("Add column").clicked() {
                requests.grow.write(RequestGrowGrid { axis: GridAxis::Columns });
            }
            let label = if open_db.dirty { "Save *" } else { "Save" };
            if ui.button(label).clicked() {
                requests.save.write(RequestSaveRecord { kind: RecordKind::Database });
            }
            if options.auto_save {
                ui.weak("Auto-save on");
            }
            ui.weak("Right-click a cell to send it to a mapper.");
        });
        ui.separator();

        egui::ScrollArea::horizontal().show(ui, |ui| {
            grid_table(ui, grid, &index.mappers, &mut requests);
        });
    });
}

fn grid_table(ui: &mut egui::Ui, grid: &DatabaseGrid, mappers: &[String], requests: &mut GridRequests) {
    let row_height = ui.text_style_height(&egui::TextStyle::Body) + ui.style().spacing.item_spacing.y + 4.0;
    let column_count = grid.column_count();

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(44.0))
        .min_scrolled_height(0.0);
    for _ in 0..column_count {
        table = table.column(Column::initial(110.0).at_least(50.0).resizable(true).clip(true));
    }

    table
        .header(20.0, |mut header| {
            header.col(|_| {});
            for col in 0..column_count {
                header.col(|ui| {
                    ui.strong(column_label(col));
                });
            }
        })
        .body(|body| {
            body.rows(row_height, grid.row_count(), |mut row| {
                let row_index = row.index();
                row.col(|ui| {
                    ui.weak((row_index + 1).to_string());
                });
                for col in 0..column_count {
                    row.col(|ui| {
                        grid_cell(ui, grid, row_index, col, mappers, requests);
                    });
                }
            });
        });
}

fn grid_cell(
    ui: &mut egui::Ui,
    grid: &DatabaseGrid,
    row: usize,
    col: usize,
    mappers: &[String],
    requests: &mut GridRequests,
) {
    let current = grid.cell(row, col).unwrap_or_default();
    let mut text = current.to_string();
    let response = ui.add(egui::TextEdit::singleline(&mut text).desired_width(f32::INFINITY));
    if response.changed() {
        requests.update_cell.write(UpdateCellEvent { row, col, value: text });
    }

    response.context_menu(|menu_ui| {
        menu_ui.label(grid.cell_reference(row, col));
        menu_ui.separator();
        if current.is_empty() {
            menu_ui.weak("Cell is empty");
            return;
        }
        if mappers.is_empty() {
            menu_ui.weak("Create a mapper first");
            return;
        }
        menu_ui.menu_button("Send to mapper", |sub_ui| {
            for mapper_id in mappers {
                if sub_ui.button(mapper_id).clicked() {
                    requests.send.write(RequestSendCellToMapper {
                        row,
                        col,
                        target_mapper_id: mapper_id.clone(),
                    });
                    sub_ui.close_menu();
                }
            }
        });
    });
}
