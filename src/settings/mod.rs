// src/settings/mod.rs
pub mod io;

use std::path::PathBuf;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::catalog::feeds::{FeedEndpoints, MITRE_ATTACK_URL, NIST_CATALOG_URL, NVD_CVE_URL};

pub const DATA_DIR_ENV: &str = "SECUREIT_DATA_DIR";
pub const NVD_API_KEY_ENV: &str = "NVD_API_KEY";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FeedSettings {
    pub nist_url: String,
    pub mitre_url: String,
    pub nvd_url: String,
    pub nvd_window_days: i64,
    pub nvd_results: u32,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            nist_url: NIST_CATALOG_URL.to_string(),
            mitre_url: MITRE_ATTACK_URL.to_string(),
            nvd_url: NVD_CVE_URL.to_string(),
            nvd_window_days: 30,
            nvd_results: 50,
        }
    }
}

#[derive(Resource, Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Where the workspace database lives; `None` uses the platform data dir.
    pub data_dir: Option<PathBuf>,
    pub auto_save: bool,
    pub show_grid_lines: bool,
    pub notifications: bool,
    pub feeds: FeedSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            auto_save: true,
            show_grid_lines: true,
            notifications: true,
            feeds: FeedSettings::default(),
        }
    }
}

impl AppSettings {
    /// Feed endpoints with the NVD key taken from the environment.
    pub fn feed_endpoints(&self) -> FeedEndpoints {
        FeedEndpoints {
            nist_url: self.feeds.nist_url.clone(),
            mitre_url: self.feeds.mitre_url.clone(),
            nvd_url: self.feeds.nvd_url.clone(),
            nvd_window_days: self.feeds.nvd_window_days.max(1),
            nvd_results: self.feeds.nvd_results.clamp(1, 2000),
            nvd_api_key: std::env::var(NVD_API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()),
        }
    }
}
