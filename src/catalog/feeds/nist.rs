// src/catalog/feeds/nist.rs

use serde::Deserialize;

use super::FeedError;
use crate::catalog::definitions::Control;

const PER_GROUP: usize = 10;
const COLLECT_LIMIT: usize = 50;
const NIST_KEEP: usize = 45;
const FEED: &str = "NIST SP 800-53";

#[derive(Deserialize)]
struct OscalDocument {
    catalog: OscalCatalog,
}

#[derive(Deserialize)]
struct OscalCatalog {
    #[serde(default)]
    groups: Vec<OscalGroup>,
}

#[derive(Deserialize)]
struct OscalGroup {
    title: Option<String>,
    #[serde(default)]
    controls: Vec<OscalControl>,
}

#[derive(Deserialize)]
struct OscalControl {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    params: Vec<OscalParam>,
    #[serde(default)]
    parts: Vec<OscalPart>,
}

#[derive(Deserialize)]
struct OscalParam {
    label: Option<String>,
}

#[derive(Deserialize)]
struct OscalPart {
    prose: Option<String>,
}

// (id, name, description, category, implemented)
const CIS_CONTROLS: &[(&str, &str, &str, &str, bool)] = &[
    (
        "CIS-1",
        "Inventory and Control of Enterprise Assets",
        "Actively manage all enterprise assets connected to the infrastructure ensuring that only authorized assets are given access.",
        "Asset Management",
        true,
    ),
    (
        "CIS-2",
        "Inventory and Control of Software Assets",
        "Actively manage all software on the network so that only authorized software is installed and can execute.",
        "Asset Management",
        true,
    ),
    (
        "CIS-3",
        "Data Protection",
        "Develop processes and technical controls to identify, classify, securely handle, retain, and dispose of data.",
        "Data Security",
        false,
    ),
    (
        "CIS-4",
        "Secure Configuration of Enterprise Assets and Software",
        "Establish and maintain the secure configuration of enterprise assets and software.",
        "Configuration Management",
        true,
    ),
    (
        "CIS-5",
        "Account Management",
        "Use processes and tools to assign and manage authorization to credentials for user accounts.",
        "Access Control",
        false,
    ),
];

fn cis_controls() -> impl Iterator<Item = Control> {
    CIS_CONTROLS
        .iter()
        .map(|&(id, name, description, category, implemented)| Control {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            framework: "CIS Controls".to_string(),
            category: category.to_string(),
            implemented,
        })
}

/// Reshapes an OSCAL catalog into the controls list: the fixed CIS
/// controls first, then at most 45 NIST controls.
///
/// Fetched NIST controls carry no implementation state and start as
/// not implemented.
pub fn parse_controls(body: &str) -> Result<Vec<Control>, FeedError> {
    let document: OscalDocument = serde_json::from_str(body).map_err(|e| FeedError::parse(FEED, e))?;

    let mut nist = Vec::new();
    for group in document.catalog.groups {
        let category = group.title.unwrap_or_else(|| "General".to_string());
        for control in group.controls.into_iter().take(PER_GROUP) {
            nist.push(Control {
                description: describe(&control),
                id: control.id,
                name: control.title,
                framework: "NIST CSF".to_string(),
                category: category.clone(),
                implemented: false,
            });
        }
        if nist.len() >= COLLECT_LIMIT {
            break;
        }
    }
    nist.truncate(NIST_KEEP);

    Ok(cis_controls().chain(nist).collect())
}

fn describe(control: &OscalControl) -> String {
    control
        .params
        .first()
        .and_then(|p| p.label.clone())
        .filter(|s| !s.is_empty())
        .or_else(|| control.parts.first().and_then(|p| p.prose.clone()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "No description available".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn group(title: &str, count: usize) -> serde_json::Value {
        let controls: Vec<_> = (0..count)
            .map(|i| json!({ "id": format!("{}-{}", title.to_lowercase(), i), "title": format!("Control {i}") }))
            .collect();
        json!({ "title": title, "controls": controls })
    }

    #[test]
    fn cis_first_then_nist() {
        let body = json!({ "catalog": { "groups": [{
            "title": "Access Control",
            "controls": [
                { "id": "ac-1", "title": "Policy", "params": [{ "label": "organization-defined personnel" }] },
                { "id": "ac-2", "title": "Accounts", "parts": [{ "prose": "Manage accounts." }] },
                { "id": "ac-3", "title": "Enforcement" }
            ]
        }, {
            "controls": [{ "id": "x-1", "title": "Untitled group" }]
        }] } })
        .to_string();

        let controls = parse_controls(&body).unwrap();
        assert_eq!(controls.len(), 9);
        assert_eq!(controls[0].id, "CIS-1");
        assert_eq!(controls[4].framework, "CIS Controls");
        assert_eq!(controls[5].description, "organization-defined personnel");
        assert_eq!(controls[6].description, "Manage accounts.");
        assert_eq!(controls[7].description, "No description available");
        assert_eq!(controls[8].category, "General");
        assert!(controls[5..].iter().all(|c| c.framework == "NIST CSF" && !c.implemented));
    }

    #[test]
    fn caps_per_group_and_total() {
        let groups: Vec<_> = ["AC", "AT", "AU", "CA", "CM", "CP", "IA"]
            .iter()
            .map(|t| group(t, 12))
            .collect();
        let body = json!({ "catalog": { "groups": groups } }).to_string();

        let controls = parse_controls(&body).unwrap();
        assert_eq!(controls.len(), 5 + 45);
        let from_first_group = controls.iter().filter(|c| c.category == "AC").count();
        assert_eq!(from_first_group, 10);
        assert!(!controls.iter().any(|c| c.category == "CP"));
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        assert!(matches!(parse_controls("{\"catalog\": 3}"), Err(FeedError::Parse { .. })));
    }
}
