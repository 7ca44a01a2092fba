// src/catalog/feeds/mitre.rs

use serde::Deserialize;

use super::FeedError;
use crate::catalog::definitions::{Severity, Threat};

const TECHNIQUE_LIMIT: usize = 100;
const FEED: &str = "MITRE ATT&CK";

#[derive(Deserialize)]
struct StixBundle {
    #[serde(default)]
    objects: Vec<StixObject>,
}

#[derive(Deserialize)]
struct StixObject {
    #[serde(rename = "type")]
    object_type: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    description: Option<String>,
    #[serde(default)]
    revoked: bool,
    #[serde(default, alias = "deprecated")]
    x_mitre_deprecated: bool,
    #[serde(default)]
    kill_chain_phases: Vec<KillChainPhase>,
    #[serde(default)]
    external_references: Vec<ExternalReference>,
}

#[derive(Deserialize)]
struct KillChainPhase {
    phase_name: String,
}

#[derive(Deserialize)]
struct ExternalReference {
    source_name: String,
    external_id: Option<String>,
}

fn severity_for_tactic(phase: &str) -> Severity {
    match phase {
        "initial-access" | "privilege-escalation" | "credential-access" | "exfiltration" | "impact" => {
            Severity::Critical
        }
        "execution" | "persistence" | "defense-evasion" | "lateral-movement" | "command-and-control" => {
            Severity::High
        }
        _ => Severity::Medium,
    }
}

/// `command-and-control` -> `Command And Control`.
fn title_case(phase: &str) -> String {
    phase
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Active `attack-pattern` objects of an ATT&CK STIX bundle, first 100.
pub fn parse_techniques(body: &str) -> Result<Vec<Threat>, FeedError> {
    let bundle: StixBundle = serde_json::from_str(body).map_err(|e| FeedError::parse(FEED, e))?;

    Ok(bundle
        .objects
        .into_iter()
        .filter(|o| o.object_type == "attack-pattern" && !o.revoked && !o.x_mitre_deprecated)
        .take(TECHNIQUE_LIMIT)
        .map(|o| {
            let phase = o
                .kill_chain_phases
                .first()
                .map(|p| p.phase_name.as_str())
                .unwrap_or("unknown");
            let mitre_id = o
                .external_references
                .iter()
                .find(|r| r.source_name == "mitre-attack")
                .and_then(|r| r.external_id.clone())
                .unwrap_or_else(|| "N/A".to_string());
            Threat {
                tactic: title_case(phase),
                severity: severity_for_tactic(phase),
                id: o.id,
                mitre_id,
                technique: o.name,
                description: o
                    .description
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| "No description available".to_string()),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_active_attack_patterns() {
        let body = json!({ "objects": [
            { "type": "x-mitre-tactic", "id": "tactic-1", "name": "Execution" },
            {
                "type": "attack-pattern", "id": "attack-pattern--1", "name": "Phishing",
                "description": "Send mail.",
                "kill_chain_phases": [{ "kill_chain_name": "mitre-attack", "phase_name": "initial-access" }],
                "external_references": [
                    { "source_name": "capec", "external_id": "CAPEC-98" },
                    { "source_name": "mitre-attack", "external_id": "T1566" }
                ]
            },
            { "type": "attack-pattern", "id": "attack-pattern--2", "name": "Old", "revoked": true },
            { "type": "attack-pattern", "id": "attack-pattern--3", "name": "Gone", "x_mitre_deprecated": true },
            {
                "type": "attack-pattern", "id": "attack-pattern--4", "name": "Beacon",
                "kill_chain_phases": [{ "phase_name": "command-and-control" }]
            },
            { "type": "attack-pattern", "id": "attack-pattern--5", "name": "Loose" }
        ] })
        .to_string();

        let threats = parse_techniques(&body).unwrap();
        assert_eq!(threats.len(), 3);

        assert_eq!(threats[0].mitre_id, "T1566");
        assert_eq!(threats[0].tactic, "Initial Access");
        assert_eq!(threats[0].severity, Severity::Critical);

        assert_eq!(threats[1].tactic, "Command And Control");
        assert_eq!(threats[1].severity, Severity::High);
        assert_eq!(threats[1].mitre_id, "N/A");
        assert_eq!(threats[1].description, "No description available");

        assert_eq!(threats[2].tactic, "Unknown");
        assert_eq!(threats[2].severity, Severity::Medium);
    }

    #[test]
    fn stops_at_one_hundred() {
        let objects: Vec<_> = (0..150)
            .map(|i| json!({ "type": "attack-pattern", "id": format!("ap-{i}"), "name": "t" }))
            .collect();
        let threats = parse_techniques(&json!({ "objects": objects }).to_string()).unwrap();
        assert_eq!(threats.len(), 100);
        assert_eq!(threats[99].id, "ap-99");
    }
}
