// src/ui/editors/mapper.rs
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::settings::AppSettings;
use crate::workspace::canvas::{MapperCanvas, PlacedBox};
use crate::workspace::events::{RequestMoveBox, RequestPlaceBox, RequestRemoveBox, RequestSaveRecord};
use crate::workspace::resources::OpenMapper;
use crate::workspace::RecordKind;

pub const BOX_SIZE: egui::Vec2 = egui::vec2(150.0, 80.0);
const GRID_STEP: f32 = 20.0;
const KEY_STEP: f32 = 10.0;
const MIN_CANVAS: egui::Vec2 = egui::vec2(1200.0, 800.0);
const CANVAS_MARGIN: f32 = 200.0;

#[derive(SystemParam)]
pub struct CanvasRequests<'w> {
    pub place: EventWriter<'w, RequestPlaceBox>,
    pub move_box: EventWriter<'w, RequestMoveBox>,
    pub remove: EventWriter<'w, RequestRemoveBox>,
    pub save: EventWriter<'w, RequestSaveRecord>,
}

/// Top-left corner for a box centered on `click`, in canvas coordinates.
pub fn placement_origin(click: egui::Vec2) -> egui::Vec2 {
    click - BOX_SIZE / 2.0
}

fn canvas_extent(canvas: &MapperCanvas, available: egui::Vec2) -> egui::Vec2 {
    let used = canvas.boxes().iter().fold(egui::Vec2::ZERO, |acc, b| {
        acc.max(egui::vec2(b.x, b.y) + BOX_SIZE + egui::Vec2::splat(CANVAS_MARGIN))
    });
    used.max(available).max(MIN_CANVAS)
}

/// Arrow key nudge for the selected box, if one was pressed.
fn key_nudge(ctx: &egui::Context) -> Option<egui::Vec2> {
    if ctx.wants_keyboard_input() {
        return None;
    }
    ctx.input(|i| {
        let mut delta = egui::Vec2::ZERO;
        if i.key_pressed(egui::Key::ArrowLeft) {
            delta.x -= KEY_STEP;
        }
        if i.key_pressed(egui::Key::ArrowRight) {
            delta.x += KEY_STEP;
        }
        if i.key_pressed(egui::Key::ArrowUp) {
            delta.y -= KEY_STEP;
        }
        if i.key_pressed(egui::Key::ArrowDown) {
            delta.y += KEY_STEP;
        }
        (delta != egui::Vec2::ZERO).then_some(delta)
    })
}

pub fn mapper_page(
    mut contexts: EguiContexts,
    mut open_mapper: ResMut<OpenMapper>,
    settings: Res<AppSettings>,
    mut requests: CanvasRequests,
) {
    let ctx = contexts.ctx_mut();
    let open = &mut *open_mapper;

    let Some(canvas) = open.canvas.as_ref() else {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Control Mapper");
            ui.label("Select a mapper in the sidebar or create a new one.");
        });
        return;
    };

    // Selection may point at a box removed this frame.
    let selected = open
        .selected_box
        .as_deref()
        .and_then(|id| canvas.get_box(id))
        .cloned();

    if let Some(placed) = &selected {
        if let Some(delta) = key_nudge(ctx) {
            requests.move_box.write(RequestMoveBox {
                box_id: placed.id.clone(),
                dx: delta.x,
                dy: delta.y,
            });
        }
        let mut close = false;
        egui::SidePanel::right("box_detail").default_width(260.0).show(ctx, |ui| {
            ui.heading(&placed.reference);
            ui.separator();
            egui::Grid::new("box_detail_grid").num_columns(2).striped(true).show(ui, |ui| {
                for (label, value) in box_fields(placed) {
                    ui.strong(label);
                    ui.add(egui::Label::new(value).wrap());
                    ui.end_row();
                }
            });
            ui.add_space(8.0);
            ui.weak("Drag the box or use the arrow keys to move it.");
            ui.horizontal(|ui| {
                if ui.button("Remove").clicked() {
                    requests.remove.write(RequestRemoveBox { box_id: placed.id.clone() });
                }
                if ui.button("Close").clicked() {
                    close = true;
                }
            });
        });
        if close {
            open.selected_box = None;
        }
    }

    let mut clicked_box: Option<String> = None;
    let mut background_click: Option<egui::Vec2> = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(format!("Mapper: {}", canvas.id()));
            ui.weak(format!("{} boxes", canvas.boxes().len()));
            let label = if open.dirty { "Save *" } else { "Save" };
            if ui.button(label).clicked() {
                requests.save.write(RequestSaveRecord { kind: RecordKind::Mapper });
            }
        });
        if let Some(pending) = &open.pending_placement {
            ui.colored_label(
                egui::Color32::LIGHT_BLUE,
                format!("Click on the canvas to place {} (\"{}\").", pending.reference, pending.value),
            );
        }
        ui.separator();

        egui::ScrollArea::both().show(ui, |ui| {
            let size = canvas_extent(canvas, ui.available_size());
            let (response, painter) = ui.allocate_painter(size, egui::Sense::click());
            let origin = response.rect.min;

            if settings.show_grid_lines {
                let stroke = egui::Stroke::new(0.5, ui.style().visuals.weak_text_color().gamma_multiply(0.3));
                let mut x = 0.0;
                while x <= size.x {
                    painter.line_segment([origin + egui::vec2(x, 0.0), origin + egui::vec2(x, size.y)], stroke);
                    x += GRID_STEP;
                }
                let mut y = 0.0;
                while y <= size.y {
                    painter.line_segment([origin + egui::vec2(0.0, y), origin + egui::vec2(size.x, y)], stroke);
                    y += GRID_STEP;
                }
            }

            for placed in canvas.boxes() {
                let rect = egui::Rect::from_min_size(origin + egui::vec2(placed.x, placed.y), BOX_SIZE);
                let box_response = ui.interact(
                    rect,
                    ui.id().with(("mapper_box", &placed.id)),
                    egui::Sense::click_and_drag(),
                );
                if box_response.clicked() || box_response.drag_started() {
                    clicked_box = Some(placed.id.clone());
                }
                let drag = box_response.drag_delta();
                if drag != egui::Vec2::ZERO {
                    requests.move_box.write(RequestMoveBox {
                        box_id: placed.id.clone(),
                        dx: drag.x,
                        dy: drag.y,
                    });
                }

                let is_selected = selected.as_ref().is_some_and(|s| s.id == placed.id);
                let stroke = if is_selected {
                    egui::Stroke::new(2.5, egui::Color32::LIGHT_BLUE)
                } else {
                    egui::Stroke::new(1.0, egui::Color32::DARK_GRAY)
                };
                painter.rect(
                    rect,
                    egui::CornerRadius::same(6),
                    ui.style().visuals.extreme_bg_color,
                    stroke,
                    egui::StrokeKind::Inside,
                );
                painter.text(
                    rect.left_top() + egui::vec2(8.0, 8.0),
                    egui::Align2::LEFT_TOP,
                    &placed.reference,
                    egui::FontId::proportional(11.0),
                    ui.style().visuals.weak_text_color(),
                );
                painter.text(
                    rect.center() + egui::vec2(0.0, 8.0),
                    egui::Align2::CENTER_CENTER,
                    &placed.value,
                    egui::FontId::proportional(14.0),
                    ui.style().visuals.text_color(),
                );
            }

            if response.clicked() {
                background_click = response.interact_pointer_pos().map(|pos| pos - origin);
            }
        });
    });

    if let Some(box_id) = clicked_box {
        open.selected_box = Some(box_id);
    } else if let Some(click) = background_click {
        if open.pending_placement.is_some() {
            let at = placement_origin(click);
            requests.place.write(RequestPlaceBox { x: at.x, y: at.y });
        } else {
            open.selected_box = None;
        }
    }
}

fn box_fields(placed: &PlacedBox) -> Vec<(&'static str, String)> {
    vec![
        ("Value", placed.value.clone()),
        ("Database", placed.source_database_id.clone()),
        ("Column", placed.source_column_label.clone()),
        ("Row", placed.source_row_number.to_string()),
        ("Position", format!("{:.0}, {:.0}", placed.x, placed.y)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_centers_box_on_click() {
        assert_eq!(placement_origin(egui::vec2(100.0, 100.0)), egui::vec2(25.0, 60.0));
        // Negative origins are clamped by the canvas itself.
        assert_eq!(placement_origin(egui::vec2(10.0, 10.0)), egui::vec2(-65.0, -30.0));
    }

    #[test]
    fn extent_grows_with_boxes() {
        let canvas = MapperCanvas::new("map-1");
        assert_eq!(canvas_extent(&canvas, egui::vec2(100.0, 100.0)), MIN_CANVAS);
    }
}
