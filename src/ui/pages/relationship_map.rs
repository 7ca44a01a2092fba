// src/ui/pages/relationship_map.rs
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::catalog::relationship_map::{MapNode, NodeLane};
use crate::catalog::resources::CatalogState;
use crate::ui::pages::catalog::show_detail_panel;
use crate::ui::UiState;
use crate::workspace::events::OperationFeedback;

const NODE_SIZE: egui::Vec2 = egui::vec2(150.0, 60.0);
const CANVAS_SIZE: egui::Vec2 = egui::vec2(1000.0, 600.0);

fn lane_heading(lane: NodeLane) -> &'static str {
    match lane {
        NodeLane::Control => "Controls",
        NodeLane::Threat => "Threats",
        NodeLane::Vulnerability => "Vulnerabilities",
        NodeLane::Asset => "Assets",
    }
}

fn lane_color(lane: NodeLane) -> egui::Color32 {
    match lane {
        NodeLane::Control => egui::Color32::from_rgb(50, 110, 200),
        NodeLane::Threat => egui::Color32::from_rgb(200, 70, 70),
        NodeLane::Vulnerability => egui::Color32::from_rgb(220, 140, 40),
        NodeLane::Asset => egui::Color32::from_rgb(60, 150, 90),
    }
}

pub fn relationship_map_page(
    mut contexts: EguiContexts,
    mut ui_state: ResMut<UiState>,
    catalogs: Res<CatalogState>,
    mut feedback: EventWriter<OperationFeedback>,
) {
    let ctx = contexts.ctx_mut();
    let map = catalogs.relationship_map();

    if let Some((lane, id)) = ui_state.map_selection.clone() {
        let closed = match lane {
            NodeLane::Control => catalogs.controls.iter().find(|c| c.id == id).map(|e| show_detail_panel(ctx, e, &mut feedback)),
            NodeLane::Threat => catalogs.threats.iter().find(|t| t.id == id).map(|e| show_detail_panel(ctx, e, &mut feedback)),
            NodeLane::Vulnerability => catalogs
                .vulnerabilities
                .iter()
                .find(|v| v.cve_id == id)
                .map(|e| show_detail_panel(ctx, e, &mut feedback)),
            NodeLane::Asset => catalogs.assets.iter().find(|a| a.id == id).map(|e| show_detail_panel(ctx, e, &mut feedback)),
        };
        if closed != Some(false) {
            ui_state.map_selection = None;
        }
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Relationship Map");
        ui.weak("Click a node to see its details.");
        ui.separator();

        egui::ScrollArea::both().show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(CANVAS_SIZE, egui::Sense::click());
            let origin = response.rect.min;
            let text_color = ui.style().visuals.text_color();
            let node_rect = |node: &MapNode| egui::Rect::from_min_size(origin + egui::vec2(node.x, node.y), NODE_SIZE);

            for lane in [NodeLane::Control, NodeLane::Threat, NodeLane::Vulnerability, NodeLane::Asset] {
                if let Some(first) = map.nodes.iter().find(|n| n.lane == lane) {
                    painter.text(
                        origin + egui::vec2(first.x, 50.0),
                        egui::Align2::LEFT_CENTER,
                        lane_heading(lane),
                        egui::FontId::proportional(16.0),
                        text_color,
                    );
                }
            }

            for edge in &map.edges {
                let from = node_rect(&map.nodes[edge.source]).center();
                let to = node_rect(&map.nodes[edge.target]).center();
                painter.line_segment([from, to], egui::Stroke::new(1.5, egui::Color32::GRAY));
                painter.text(
                    from + (to - from) * 0.5,
                    egui::Align2::CENTER_BOTTOM,
                    edge.kind.as_str(),
                    egui::FontId::proportional(11.0),
                    egui::Color32::LIGHT_GRAY,
                );
            }

            for node in &map.nodes {
                let rect = node_rect(node);
                let selected = ui_state
                    .map_selection
                    .as_ref()
                    .is_some_and(|(lane, id)| *lane == node.lane && *id == node.id);
                let stroke = if selected {
                    egui::Stroke::new(3.0, egui::Color32::WHITE)
                } else {
                    egui::Stroke::new(1.0, egui::Color32::BLACK)
                };
                painter.rect(
                    rect,
                    egui::CornerRadius::same(6),
                    lane_color(node.lane),
                    stroke,
                    egui::StrokeKind::Inside,
                );
                painter.text(
                    rect.center_top() + egui::vec2(0.0, 18.0),
                    egui::Align2::CENTER_CENTER,
                    &node.title,
                    egui::FontId::proportional(14.0),
                    egui::Color32::WHITE,
                );
                painter.text(
                    rect.center_bottom() - egui::vec2(0.0, 18.0),
                    egui::Align2::CENTER_CENTER,
                    truncate(&node.subtitle, 22),
                    egui::FontId::proportional(11.0),
                    egui::Color32::WHITE,
                );
            }

            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let local = pos - origin;
                    ui_state.map_selection = map
                        .node_at(local.x, local.y, NODE_SIZE.x, NODE_SIZE.y)
                        .map(|node| (node.lane, node.id.clone()));
                }
            }
        });
    });
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 22), "short");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }
}
