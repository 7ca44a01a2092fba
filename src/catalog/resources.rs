// src/catalog/resources.rs
use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use chrono::{DateTime, Utc};

use super::compliance::ComplianceSummary;
use super::definitions::{Asset, Control, Relationship, Threat, Vulnerability};
use super::feeds::{FeedEndpoints, FeedKind, FeedPayload, FetchedCatalog};
use super::mock_data;
use super::relationship_map::RelationshipMap;

/// The catalogs currently shown. Starts with the bundled data; a
/// successful sync replaces one list wholesale.
#[derive(Resource, Debug, Clone)]
pub struct CatalogState {
    pub controls: Vec<Control>,
    pub threats: Vec<Threat>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub assets: Vec<Asset>,
    pub relationships: Vec<Relationship>,
    pub last_synced: HashMap<FeedKind, DateTime<Utc>>,
    pub syncing: HashSet<FeedKind>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            controls: mock_data::controls(),
            threats: mock_data::threats(),
            vulnerabilities: mock_data::vulnerabilities(),
            assets: mock_data::assets(),
            relationships: mock_data::relationships(),
            last_synced: HashMap::new(),
            syncing: HashSet::new(),
        }
    }
}

impl CatalogState {
    pub fn apply(&mut self, payload: FeedPayload) -> (FeedKind, usize) {
        let count = payload.catalog.len();
        let kind = match payload.catalog {
            FetchedCatalog::Controls(items) => {
                self.controls = items;
                FeedKind::Controls
            }
            FetchedCatalog::Threats(items) => {
                self.threats = items;
                FeedKind::Threats
            }
            FetchedCatalog::Vulnerabilities(items) => {
                self.vulnerabilities = items;
                FeedKind::Vulnerabilities
            }
        };
        self.last_synced.insert(kind, payload.fetched_at);
        (kind, count)
    }

    pub fn is_syncing(&self, kind: FeedKind) -> bool {
        self.syncing.contains(&kind)
    }

    pub fn summary(&self) -> ComplianceSummary {
        ComplianceSummary::compute(&self.controls, &self.threats, &self.vulnerabilities)
    }

    pub fn relationship_map(&self) -> RelationshipMap {
        RelationshipMap::build(
            &self.controls,
            &self.threats,
            &self.vulnerabilities,
            &self.assets,
            &self.relationships,
        )
    }
}

/// Feed locations, built from the settings file and environment.
#[derive(Resource, Debug, Clone, Default)]
pub struct FeedConfig(pub FeedEndpoints);
