// src/ui/pages/compliance.rs
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::catalog::compliance::{Ratio, GOOD_THRESHOLD};
use crate::catalog::resources::CatalogState;
use crate::ui::pages::stat_card;

pub fn compliance_page(mut contexts: EguiContexts, catalogs: Res<CatalogState>) {
    let ctx = contexts.ctx_mut();
    let summary = catalogs.summary();

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Compliance Overview");
        ui.separator();

        let percent = summary.compliance_percent();
        let rating_color = if percent >= GOOD_THRESHOLD {
            egui::Color32::from_rgb(90, 170, 90)
        } else {
            egui::Color32::from_rgb(230, 140, 40)
        };
        ui.horizontal(|ui| {
            ui.label(format!(
                "{} of {} controls implemented",
                summary.controls.done, summary.controls.total
            ));
            ui.colored_label(rating_color, summary.rating());
        });
        ui.add(egui::ProgressBar::new(percent as f32 / 100.0).text(format!("{}%", percent)));
        ui.add_space(12.0);

        ui.columns(2, |columns| {
            columns[0].strong("By framework");
            for (name, ratio) in &summary.frameworks {
                ratio_row(&mut columns[0], name, ratio);
            }
            columns[1].strong("By function");
            for (name, ratio) in &summary.functions {
                ratio_row(&mut columns[1], name, ratio);
            }
        });
        ui.add_space(12.0);

        ui.horizontal_wrapped(|ui| {
            stat_card(ui, "Threats", summary.total_threats.to_string());
            stat_card(ui, "Critical threats", summary.critical_threats.to_string());
            stat_card(ui, "Vulnerabilities", summary.total_vulnerabilities.to_string());
            stat_card(ui, "Open", summary.open_vulnerabilities.to_string());
            stat_card(ui, "Critical open", summary.critical_open_vulnerabilities.to_string());
        });
        ui.add_space(12.0);

        ui.strong("Recent activity");
        if summary.recent_activity.is_empty() {
            ui.weak("No critical open vulnerabilities.");
        }
        for (cve, product) in &summary.recent_activity {
            ui.label(format!("Critical vulnerability {} detected in {}", cve, product));
        }
    });
}

fn ratio_row(ui: &mut egui::Ui, name: &str, ratio: &Ratio) {
    ui.horizontal(|ui| {
        ui.label(name);
        ui.weak(format!("{}/{}", ratio.done, ratio.total));
    });
    ui.add(egui::ProgressBar::new(ratio.percent() as f32 / 100.0).text(format!("{}%", ratio.percent())));
}
