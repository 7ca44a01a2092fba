// src/main.rs

#![cfg_attr(all(not(debug_assertions), target_os = "windows"), windows_subsystem = "windows")]

use bevy::{
    log::LogPlugin,
    prelude::*,
    window::WindowPlugin,
    winit::{UpdateMode, WinitSettings},
};
use clap::Parser;
use std::time::Duration;

use bevy_egui::EguiPlugin;
use bevy_tokio_tasks::TokioTasksPlugin;

mod catalog;
mod cli;
mod session;
mod settings;
mod ui;
mod workspace;

use catalog::resources::FeedConfig;
use catalog::CatalogPlugin;
use ui::DashboardUiPlugin;
use workspace::resources::WorkspaceOptions;
use workspace::{StoreLocation, WorkspacePlugin};

fn main() {
    dotenvy::dotenv().ok();
    let args = cli::Cli::parse();

    if let Some(command) = args.command {
        if let Err(e) = cli::run(command, args.data_dir.as_deref()) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let app_settings = settings::io::load_or_default();
    let data_dir = settings::io::resolve_data_dir(&app_settings, args.data_dir.as_deref());
    let store_path = settings::io::store_path(&data_dir);

    App::new()
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::Continuous,
            unfocused_mode: UpdateMode::reactive_low_power(Duration::from_secs_f32(1.0 / 5.0)),
        })
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "SecureIT Workbench".into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    level: bevy::log::Level::INFO,
                    filter: "wgpu=error,naga=warn,bevy_tokio_tasks=warn".to_string(),
                    ..default()
                }),
        )
        .add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: true,
        })
        .add_plugins(TokioTasksPlugin::default())
        .insert_resource(FeedConfig(app_settings.feed_endpoints()))
        .insert_resource(WorkspaceOptions {
            auto_save: app_settings.auto_save,
        })
        .insert_resource(app_settings)
        .add_plugins(WorkspacePlugin {
            location: StoreLocation::File(store_path),
        })
        .add_plugins(CatalogPlugin)
        .add_plugins(DashboardUiPlugin)
        .run();
}
