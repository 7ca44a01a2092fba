// src/catalog/definitions.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel category meaning "no categorical filter".
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Controls,
    Threats,
    Vulnerabilities,
    Assets,
}

impl CatalogKind {
    pub fn title(self) -> &'static str {
        match self {
            CatalogKind::Controls => "Controls Catalog",
            CatalogKind::Threats => "Threats & Techniques",
            CatalogKind::Vulnerabilities => "Vulnerabilities",
            CatalogKind::Assets => "Asset Inventory",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Controls => write!(f, "controls"),
            CatalogKind::Threats => write!(f, "threats"),
            CatalogKind::Vulnerabilities => write!(f, "vulnerabilities"),
            CatalogKind::Assets => write!(f, "assets"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// NVD bands: >= 9.0 Critical, >= 7.0 High, >= 4.0 Medium, else Low.
    pub fn from_cvss(score: f64) -> Self {
        if score >= 9.0 {
            Severity::Critical
        } else if score >= 7.0 {
            Severity::High
        } else if score >= 4.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VulnerabilityStatus {
    Open,
    Mitigated,
    Patched,
}

impl VulnerabilityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VulnerabilityStatus::Open => "Open",
            VulnerabilityStatus::Mitigated => "Mitigated",
            VulnerabilityStatus::Patched => "Patched",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    Server,
    Database,
    #[serde(rename = "Cloud Resource")]
    CloudResource,
    #[serde(rename = "Network Device")]
    NetworkDevice,
    Endpoint,
}

impl AssetType {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::Server => "Server",
            AssetType::Database => "Database",
            AssetType::CloudResource => "Cloud Resource",
            AssetType::NetworkDevice => "Network Device",
            AssetType::Endpoint => "Endpoint",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetStatus {
    Active,
    Inactive,
    Maintenance,
}

impl AssetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetStatus::Active => "Active",
            AssetStatus::Inactive => "Inactive",
            AssetStatus::Maintenance => "Maintenance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    pub name: String,
    pub description: String,
    pub framework: String,
    pub category: String,
    pub implemented: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threat {
    pub id: String,
    pub tactic: String,
    pub technique: String,
    pub description: String,
    pub mitre_id: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub id: String,
    pub cve_id: String,
    pub description: String,
    pub severity: Severity,
    pub cvss_score: f64,
    pub affected_product: String,
    pub status: VulnerabilityStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub location: String,
    pub owner: String,
    pub criticality: Severity,
    pub status: AssetStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Mitigates,
    Exploits,
    Affects,
    Protects,
}

impl RelationshipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipKind::Mitigates => "mitigates",
            RelationshipKind::Exploits => "exploits",
            RelationshipKind::Affects => "affects",
            RelationshipKind::Protects => "protects",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
}

/// What the list/filter/detail views need from an entry.
pub trait CatalogEntry {
    const KIND: CatalogKind;

    /// Filter options, starting with [`ALL_CATEGORIES`].
    const CATEGORIES: &'static [&'static str];

    fn entry_id(&self) -> &str;

    fn title(&self) -> &str;

    /// Fields the free-text query is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Value compared with the selected category.
    fn category(&self) -> &str;

    /// Every field, in display order, for the detail panel.
    fn detail_fields(&self) -> Vec<(&'static str, String)>;

    /// Public page describing the entry, when there is one.
    fn reference_url(&self) -> Option<String> {
        None
    }
}

impl CatalogEntry for Control {
    const KIND: CatalogKind = CatalogKind::Controls;
    const CATEGORIES: &'static [&'static str] = &[ALL_CATEGORIES, "NIST CSF", "CIS Controls"];

    fn entry_id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.id, &self.name, &self.description]
    }

    fn category(&self) -> &str {
        &self.framework
    }

    fn detail_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Name", self.name.clone()),
            ("Description", self.description.clone()),
            ("Framework", self.framework.clone()),
            ("Category", self.category.clone()),
            ("Implemented", if self.implemented { "Yes" } else { "No" }.to_string()),
        ]
    }
}

impl CatalogEntry for Threat {
    const KIND: CatalogKind = CatalogKind::Threats;
    const CATEGORIES: &'static [&'static str] = &[ALL_CATEGORIES, "Critical", "High", "Medium", "Low"];

    fn entry_id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.technique
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.id, &self.technique, &self.tactic]
    }

    fn category(&self) -> &str {
        self.severity.as_str()
    }

    fn detail_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("MITRE ID", self.mitre_id.clone()),
            ("Technique", self.technique.clone()),
            ("Tactic", self.tactic.clone()),
            ("Description", self.description.clone()),
            ("Severity", self.severity.as_str().to_string()),
        ]
    }

    fn reference_url(&self) -> Option<String> {
        if self.mitre_id.starts_with('T') {
            Some(format!(
                "https://attack.mitre.org/techniques/{}/",
                self.mitre_id.replace('.', "/")
            ))
        } else {
            None
        }
    }
}

impl CatalogEntry for Vulnerability {
    const KIND: CatalogKind = CatalogKind::Vulnerabilities;
    const CATEGORIES: &'static [&'static str] = &[ALL_CATEGORIES, "Open", "Mitigated", "Patched"];

    fn entry_id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.cve_id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.cve_id, &self.description, &self.affected_product]
    }

    fn category(&self) -> &str {
        self.status.as_str()
    }

    fn detail_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("CVE ID", self.cve_id.clone()),
            ("Description", self.description.clone()),
            ("Severity", self.severity.as_str().to_string()),
            ("CVSS Score", format!("{:.1}", self.cvss_score)),
            ("Affected Product", self.affected_product.clone()),
            ("Status", self.status.as_str().to_string()),
        ]
    }

    fn reference_url(&self) -> Option<String> {
        self.cve_id
            .starts_with("CVE-")
            .then(|| format!("https://nvd.nist.gov/vuln/detail/{}", self.cve_id))
    }
}

impl CatalogEntry for Asset {
    const KIND: CatalogKind = CatalogKind::Assets;
    const CATEGORIES: &'static [&'static str] = &[
        ALL_CATEGORIES,
        "Server",
        "Database",
        "Cloud Resource",
        "Network Device",
        "Endpoint",
    ];

    fn entry_id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.id, &self.name, &self.owner]
    }

    fn category(&self) -> &str {
        self.asset_type.as_str()
    }

    fn detail_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Name", self.name.clone()),
            ("Type", self.asset_type.as_str().to_string()),
            ("Location", self.location.clone()),
            ("Owner", self.owner.clone()),
            ("Criticality", self.criticality.as_str().to_string()),
            ("Status", self.status.as_str().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shapes_match_feed_payloads() {
        let threat: Threat = serde_json::from_value(serde_json::json!({
            "id": "T1", "tactic": "Execution", "technique": "X",
            "description": "d", "mitreId": "T1059", "severity": "High"
        }))
        .unwrap();
        assert_eq!(threat.severity, Severity::High);

        let asset: Asset = serde_json::from_value(serde_json::json!({
            "id": "A", "name": "n", "type": "Network Device", "location": "l",
            "owner": "o", "criticality": "Low", "status": "Maintenance"
        }))
        .unwrap();
        assert_eq!(asset.asset_type, AssetType::NetworkDevice);
        assert_eq!(asset.category(), "Network Device");
    }

    #[test]
    fn cvss_bands() {
        assert_eq!(Severity::from_cvss(9.0), Severity::Critical);
        assert_eq!(Severity::from_cvss(8.9), Severity::High);
        assert_eq!(Severity::from_cvss(4.0), Severity::Medium);
        assert_eq!(Severity::from_cvss(0.0), Severity::Low);
    }

    #[test]
    fn reference_urls() {
        let threat = Threat {
            id: "x".into(),
            tactic: "t".into(),
            technique: "t".into(),
            description: "d".into(),
            mitre_id: "T1059.001".into(),
            severity: Severity::Low,
        };
        assert_eq!(
            threat.reference_url().as_deref(),
            Some("https://attack.mitre.org/techniques/T1059/001/")
        );
    }
}
