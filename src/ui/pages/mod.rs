// src/ui/pages/mod.rs
pub mod catalog;
pub mod compliance;
pub mod home;
pub mod relationship_map;
pub mod settings;

use bevy_egui::egui;

use crate::catalog::definitions::Severity;

pub(crate) fn severity_color(severity: Severity) -> egui::Color32 {
    match severity {
        Severity::Critical => egui::Color32::from_rgb(220, 60, 60),
        Severity::High => egui::Color32::from_rgb(230, 140, 40),
        Severity::Medium => egui::Color32::from_rgb(210, 190, 60),
        Severity::Low => egui::Color32::from_rgb(90, 170, 90),
    }
}

/// Headline number with a caption underneath.
pub(crate) fn stat_card(ui: &mut egui::Ui, caption: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(140.0);
        ui.vertical(|ui| {
            ui.heading(value);
            ui.weak(caption);
        });
    });
}
