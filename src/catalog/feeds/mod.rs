// src/catalog/feeds/mod.rs

pub mod mitre;
pub mod nist;
pub mod nvd;

use std::fmt;
use std::str::FromStr;

use bevy::log::{debug, info};
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::definitions::{CatalogKind, Control, Threat, Vulnerability};

pub const NIST_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/usnistgov/oscal-content/main/nist.gov/SP800-53/rev5/json/NIST_SP-800-53_rev5_catalog.json";
pub const MITRE_ATTACK_URL: &str =
    "https://raw.githubusercontent.com/mitre/cti/master/enterprise-attack/enterprise-attack.json";
pub const NVD_CVE_URL: &str = "https://services.nvd.nist.gov/rest/json/cves/2.0";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{feed} responded with status {status}")]
    Status { feed: &'static str, status: u16 },
    #[error("{feed} returned an unexpected payload: {source}")]
    Parse {
        feed: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown feed '{0}' (expected controls, threats or vulnerabilities)")]
    UnknownFeed(String),
}

impl FeedError {
    pub(crate) fn parse(feed: &'static str, source: serde_json::Error) -> Self {
        FeedError::Parse { feed, source }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Controls,
    Threats,
    Vulnerabilities,
}

impl FeedKind {
    /// The feed behind a catalog page; assets have none.
    pub fn for_catalog(kind: CatalogKind) -> Option<Self> {
        match kind {
            CatalogKind::Controls => Some(FeedKind::Controls),
            CatalogKind::Threats => Some(FeedKind::Threats),
            CatalogKind::Vulnerabilities => Some(FeedKind::Vulnerabilities),
            CatalogKind::Assets => None,
        }
    }

    fn source_name(self) -> &'static str {
        match self {
            FeedKind::Controls => "NIST SP 800-53",
            FeedKind::Threats => "MITRE ATT&CK",
            FeedKind::Vulnerabilities => "NVD",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::Controls => write!(f, "controls"),
            FeedKind::Threats => write!(f, "threats"),
            FeedKind::Vulnerabilities => write!(f, "vulnerabilities"),
        }
    }
}

impl FromStr for FeedKind {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "controls" => Ok(FeedKind::Controls),
            "threats" | "techniques" => Ok(FeedKind::Threats),
            "vulnerabilities" | "cves" => Ok(FeedKind::Vulnerabilities),
            other => Err(FeedError::UnknownFeed(other.to_string())),
        }
    }
}

/// Where and how much to fetch. Built from `AppSettings`.
#[derive(Debug, Clone)]
pub struct FeedEndpoints {
    pub nist_url: String,
    pub mitre_url: String,
    pub nvd_url: String,
    pub nvd_window_days: i64,
    pub nvd_results: u32,
    pub nvd_api_key: Option<String>,
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self {
            nist_url: NIST_CATALOG_URL.to_string(),
            mitre_url: MITRE_ATTACK_URL.to_string(),
            nvd_url: NVD_CVE_URL.to_string(),
            nvd_window_days: 30,
            nvd_results: 50,
            nvd_api_key: None,
        }
    }
}

impl FeedEndpoints {
    fn url_for(&self, kind: FeedKind, now: DateTime<Utc>) -> String {
        match kind {
            FeedKind::Controls => self.nist_url.clone(),
            FeedKind::Threats => self.mitre_url.clone(),
            FeedKind::Vulnerabilities => {
                nvd::request_url(&self.nvd_url, now, self.nvd_window_days, self.nvd_results)
            }
        }
    }

    fn api_key_for(&self, kind: FeedKind) -> Option<&str> {
        match kind {
            FeedKind::Vulnerabilities => self.nvd_api_key.as_deref(),
            _ => None,
        }
    }
}

/// A replacement list for one catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedCatalog {
    Controls(Vec<Control>),
    Threats(Vec<Threat>),
    Vulnerabilities(Vec<Vulnerability>),
}

impl FetchedCatalog {
    pub fn len(&self) -> usize {
        match self {
            FetchedCatalog::Controls(items) => items.len(),
            FetchedCatalog::Threats(items) => items.len(),
            FetchedCatalog::Vulnerabilities(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedPayload {
    pub catalog: FetchedCatalog,
    pub fetched_at: DateTime<Utc>,
}

/// Reshapes a raw feed body into catalog entries.
pub fn parse_feed(kind: FeedKind, body: &str, fetched_at: DateTime<Utc>) -> Result<FeedPayload, FeedError> {
    let catalog = match kind {
        FeedKind::Controls => FetchedCatalog::Controls(nist::parse_controls(body)?),
        FeedKind::Threats => FetchedCatalog::Threats(mitre::parse_techniques(body)?),
        FeedKind::Vulnerabilities => FetchedCatalog::Vulnerabilities(nvd::parse_cves(body)?),
    };
    Ok(FeedPayload { catalog, fetched_at })
}

pub async fn fetch(kind: FeedKind, endpoints: &FeedEndpoints) -> Result<FeedPayload, FeedError> {
    let now = Utc::now();
    let url = endpoints.url_for(kind, now);
    info!("Feeds: Fetching {} from {}", kind, url);

    let mut request = reqwest::Client::new()
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/json");
    if let Some(key) = endpoints.api_key_for(kind) {
        request = request.header("apiKey", key);
    }
    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(FeedError::Status {
            feed: kind.source_name(),
            status: response.status().as_u16(),
        });
    }
    let body = response.text().await?;
    debug!("Feeds: {} body is {} bytes", kind, body.len());

    let payload = parse_feed(kind, &body, now)?;
    info!("Feeds: Parsed {} {} entries", payload.catalog.len(), kind);
    Ok(payload)
}

/// Same as [`fetch`] for callers without a runtime (the CLI).
pub fn fetch_blocking(kind: FeedKind, endpoints: &FeedEndpoints) -> Result<FeedPayload, FeedError> {
    let now = Utc::now();
    let url = endpoints.url_for(kind, now);
    info!("Feeds: Fetching {} from {}", kind, url);

    let mut request = reqwest::blocking::Client::new()
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/json");
    if let Some(key) = endpoints.api_key_for(kind) {
        request = request.header("apiKey", key);
    }
    let response = request.send()?;
    if !response.status().is_success() {
        return Err(FeedError::Status {
            feed: kind.source_name(),
            status: response.status().as_u16(),
        });
    }
    parse_feed(kind, &response.text()?, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_names_parse() {
        assert_eq!("Threats".parse::<FeedKind>().unwrap(), FeedKind::Threats);
        assert_eq!("cves".parse::<FeedKind>().unwrap(), FeedKind::Vulnerabilities);
        assert!(matches!("assets".parse::<FeedKind>(), Err(FeedError::UnknownFeed(_))));
    }

    #[test]
    fn assets_have_no_feed() {
        assert_eq!(FeedKind::for_catalog(CatalogKind::Threats), Some(FeedKind::Threats));
        assert_eq!(FeedKind::for_catalog(CatalogKind::Assets), None);
    }

    #[test]
    fn parse_feed_dispatches_by_kind() {
        let now = Utc::now();
        let payload = parse_feed(FeedKind::Vulnerabilities, r#"{"vulnerabilities": []}"#, now).unwrap();
        assert_eq!(payload.catalog, FetchedCatalog::Vulnerabilities(Vec::new()));
        assert_eq!(payload.fetched_at, now);

        let controls = parse_feed(FeedKind::Controls, r#"{"catalog": {"groups": []}}"#, now).unwrap();
        assert_eq!(controls.catalog.len(), 5);
    }

    #[test]
    fn only_nvd_gets_the_api_key() {
        let endpoints = FeedEndpoints {
            nvd_api_key: Some("k".to_string()),
            ..FeedEndpoints::default()
        };
        assert_eq!(endpoints.api_key_for(FeedKind::Vulnerabilities), Some("k"));
        assert_eq!(endpoints.api_key_for(FeedKind::Threats), None);
        assert!(endpoints.url_for(FeedKind::Vulnerabilities, Utc::now()).contains("resultsPerPage=50"));
    }
}
