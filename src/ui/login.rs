// src/ui/login.rs
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::session::{CurrentSession, Session};
use crate::ui::{Page, UiState};
use crate::workspace::resources::WorkspaceStore;

#[derive(Default)]
pub struct LoginForm {
    username: String,
    password: String,
    error: Option<String>,
    prefilled: bool,
}

pub fn login_screen(
    mut contexts: EguiContexts,
    mut form: Local<LoginForm>,
    mut session: ResMut<CurrentSession>,
    mut store: ResMut<WorkspaceStore>,
    mut ui_state: ResMut<UiState>,
) {
    if !form.prefilled {
        form.username = whoami::username();
        form.prefilled = true;
    }

    let ctx = contexts.ctx_mut();
    let mut submit = false;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);
            ui.heading("SecureIT Workbench");
            ui.label("Sign in to continue");
            ui.add_space(12.0);

            egui::Grid::new("login_grid").num_columns(2).spacing([8.0, 8.0]).show(ui, |ui| {
                ui.label("Username:");
                ui.add(egui::TextEdit::singleline(&mut form.username).desired_width(200.0));
                ui.end_row();

                ui.label("Password:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut form.password)
                        .password(true)
                        .desired_width(200.0),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                ui.end_row();
            });

            ui.add_space(8.0);
            if ui.button("Sign in").clicked() {
                submit = true;
            }
            if let Some(error) = &form.error {
                ui.colored_label(egui::Color32::RED, error);
            }
            ui.add_space(8.0);
            ui.small("Usernames containing \"admin\" or \"super\" get elevated roles.");
        });
    });

    if !submit {
        return;
    }

    match Session::login(&form.username, &form.password) {
        Ok(new_session) => {
            if let Err(e) = new_session.persist(&mut store.store) {
                warn!("Signed in without persisting the session: {}", e);
            }
            info!("Signed in as '{}' ({})", new_session.username, new_session.role);
            session.0 = Some(new_session);
            ui_state.page = Page::Home;
            form.password.clear();
            form.error = None;
        }
        Err(e) => form.error = Some(e.to_string()),
    }
}
