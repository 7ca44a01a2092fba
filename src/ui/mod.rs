// src/ui/mod.rs
pub mod editors;
pub mod login;
pub mod navigation;
pub mod pages;
pub mod popups;
pub mod systems;

use std::collections::HashMap;

use bevy::prelude::*;
use bevy_egui::EguiContextPass;

use crate::catalog::filter::CatalogFilter;
use crate::catalog::relationship_map::NodeLane;
use crate::catalog::CatalogKind;
use crate::session::CurrentSession;
use crate::settings::AppSettings;

/// Latest operation outcome, shown in the status bar.
#[derive(Resource, Default, Debug, Clone)]
pub struct UiFeedbackState {
    pub last_message: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Catalog(CatalogKind),
    Compliance,
    RelationshipMap,
    Database,
    Mapper,
    Settings,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Catalog(kind) => kind.title(),
            Page::Compliance => "Compliance",
            Page::RelationshipMap => "Relationship Map",
            Page::Database => "Database",
            Page::Mapper => "Control Mapper",
            Page::Settings => "Settings",
        }
    }
}

/// Search box, category and selected entry of one catalog page.
#[derive(Debug, Clone, Default)]
pub struct CatalogViewState {
    pub filter: CatalogFilter,
    pub selected: Option<String>,
}

#[derive(Resource, Debug, Default)]
pub struct UiState {
    pub page: Page,
    pub catalogs: HashMap<CatalogKind, CatalogViewState>,
    /// Node clicked on the relationship map.
    pub map_selection: Option<(NodeLane, String)>,
}

impl UiState {
    pub fn catalog_view(&mut self, kind: CatalogKind) -> &mut CatalogViewState {
        self.catalogs.entry(kind).or_default()
    }
}

pub fn signed_in(session: Res<CurrentSession>) -> bool {
    session.0.is_some()
}

pub fn on_page(page: Page) -> impl Fn(Res<UiState>) -> bool + Clone {
    move |state: Res<UiState>| state.page == page
}

fn on_catalog_page(state: Res<UiState>) -> bool {
    matches!(state.page, Page::Catalog(_))
}

pub struct DashboardUiPlugin;

impl Plugin for DashboardUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiFeedbackState>()
            .init_resource::<UiState>()
            .init_resource::<CurrentSession>()
            .init_resource::<AppSettings>()
            .add_systems(Startup, systems::restore_session)
            .add_systems(
                Update,
                (systems::handle_ui_feedback, systems::follow_opened_records),
            )
            .add_systems(
                EguiContextPass,
                login::login_screen.run_if(not(signed_in)),
            )
            .add_systems(
                EguiContextPass,
                (
                    navigation::navigation_panel,
                    (
                        pages::home::home_page.run_if(on_page(Page::Home)),
                        pages::catalog::catalog_page.run_if(on_catalog_page),
                        pages::compliance::compliance_page.run_if(on_page(Page::Compliance)),
                        pages::relationship_map::relationship_map_page
                            .run_if(on_page(Page::RelationshipMap)),
                        editors::database::database_page.run_if(on_page(Page::Database)),
                        editors::mapper::mapper_page.run_if(on_page(Page::Mapper)),
                        pages::settings::settings_page.run_if(on_page(Page::Settings)),
                    ),
                )
                    .chain()
                    .run_if(signed_in),
            );
        info!("DashboardUiPlugin initialized.");
    }
}
