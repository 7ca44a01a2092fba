// src/catalog/mock_data.rs

use super::definitions::{
    Asset, AssetStatus, AssetType, Control, Relationship, RelationshipKind, Severity, Threat,
    Vulnerability, VulnerabilityStatus,
};

// --- Controls ---
// (id, name, description, framework, category, implemented)
const CONTROLS: &[(&str, &str, &str, &str, &str, bool)] = &[
    (
        "NIST-CSF-ID.AM-1",
        "Physical devices and systems inventory",
        "Physical devices and systems within the organization are inventoried",
        "NIST CSF",
        "Identify",
        true,
    ),
    (
        "NIST-CSF-PR.AC-1",
        "Identity and credentials management",
        "Identities and credentials are issued, managed, verified, revoked, and audited for authorized devices, users and processes",
        "NIST CSF",
        "Protect",
        true,
    ),
    (
        "CIS-1.1",
        "Establish and Maintain Detailed Enterprise Asset Inventory",
        "Establish and maintain an accurate, detailed, and up-to-date inventory of all enterprise assets",
        "CIS Controls",
        "Asset Management",
        false,
    ),
    (
        "CIS-4.1",
        "Establish and Maintain a Secure Configuration Process",
        "Establish and maintain a secure configuration process for enterprise assets",
        "CIS Controls",
        "Secure Configuration",
        true,
    ),
    (
        "NIST-CSF-DE.CM-1",
        "Network monitoring",
        "The network is monitored to detect potential cybersecurity events",
        "NIST CSF",
        "Detect",
        true,
    ),
    (
        "CIS-6.2",
        "Establish and Maintain a Software Inventory",
        "Establish and maintain a detailed inventory of all licensed software installed on enterprise assets",
        "CIS Controls",
        "Asset Management",
        false,
    ),
    (
        "NIST-CSF-RS.RP-1",
        "Response plan execution",
        "Response plan is executed during or after an incident",
        "NIST CSF",
        "Respond",
        true,
    ),
    (
        "CIS-13.1",
        "Centralize Security Event Alerting",
        "Centralize security event alerting across enterprise assets",
        "CIS Controls",
        "Network Monitoring",
        false,
    ),
];

// --- Threats ---
// (id / MITRE id, tactic, technique, description, severity)
const THREATS: &[(&str, &str, &str, &str, Severity)] = &[
    (
        "T1190",
        "Initial Access",
        "Exploit Public-Facing Application",
        "Adversaries may attempt to take advantage of a weakness in an Internet-facing computer or program using software, data, or commands in order to cause unintended behavior",
        Severity::High,
    ),
    (
        "T1078",
        "Defense Evasion",
        "Valid Accounts",
        "Adversaries may obtain and abuse credentials of existing accounts as a means of gaining Initial Access, Persistence, Privilege Escalation, or Defense Evasion",
        Severity::Critical,
    ),
    (
        "T1486",
        "Impact",
        "Data Encrypted for Impact",
        "Adversaries may encrypt data on target systems or on large numbers of systems in a network to interrupt availability to system and network resources",
        Severity::Critical,
    ),
    (
        "T1566",
        "Initial Access",
        "Phishing",
        "Adversaries may send phishing messages to gain access to victim systems. All forms of phishing are electronically delivered social engineering",
        Severity::High,
    ),
    (
        "T1071",
        "Command and Control",
        "Application Layer Protocol",
        "Adversaries may communicate using OSI application layer protocols to avoid detection/network filtering by blending in with existing traffic",
        Severity::Medium,
    ),
    (
        "T1003",
        "Credential Access",
        "OS Credential Dumping",
        "Adversaries may attempt to dump credentials to obtain account login and credential material",
        Severity::High,
    ),
    (
        "T1059",
        "Execution",
        "Command and Scripting Interpreter",
        "Adversaries may abuse command and script interpreters to execute commands, scripts, or binaries",
        Severity::Medium,
    ),
    (
        "T1068",
        "Privilege Escalation",
        "Exploitation for Privilege Escalation",
        "Adversaries may exploit software vulnerabilities in an attempt to elevate privileges",
        Severity::High,
    ),
];

// --- Vulnerabilities ---
// (id, cve id, description, severity, cvss, affected product, status)
const VULNERABILITIES: &[(&str, &str, &str, Severity, f64, &str, VulnerabilityStatus)] = &[
    (
        "1",
        "CVE-2024-1234",
        "Remote code execution vulnerability in web server application due to improper input validation",
        Severity::Critical,
        9.8,
        "Apache HTTP Server 2.4.x",
        VulnerabilityStatus::Open,
    ),
    (
        "2",
        "CVE-2024-5678",
        "SQL injection vulnerability in database management interface allows unauthorized data access",
        Severity::High,
        8.1,
        "MySQL 8.0.x",
        VulnerabilityStatus::Mitigated,
    ),
    (
        "3",
        "CVE-2023-9876",
        "Cross-site scripting (XSS) vulnerability in web application framework",
        Severity::Medium,
        6.5,
        "React 17.x",
        VulnerabilityStatus::Patched,
    ),
    (
        "4",
        "CVE-2024-2468",
        "Privilege escalation vulnerability in operating system kernel",
        Severity::Critical,
        9.3,
        "Windows Server 2019",
        VulnerabilityStatus::Open,
    ),
    (
        "5",
        "CVE-2024-1357",
        "Authentication bypass vulnerability in VPN software",
        Severity::High,
        7.8,
        "Cisco AnyConnect 4.x",
        VulnerabilityStatus::Mitigated,
    ),
    (
        "6",
        "CVE-2023-7890",
        "Buffer overflow vulnerability in network driver",
        Severity::Medium,
        5.9,
        "Linux Kernel 5.x",
        VulnerabilityStatus::Patched,
    ),
    (
        "7",
        "CVE-2024-3690",
        "Denial of service vulnerability in DNS server",
        Severity::High,
        7.5,
        "BIND 9.x",
        VulnerabilityStatus::Open,
    ),
    (
        "8",
        "CVE-2024-1470",
        "Information disclosure vulnerability in cloud storage service",
        Severity::Low,
        4.3,
        "AWS S3 SDK",
        VulnerabilityStatus::Patched,
    ),
];

// --- Assets ---
// (id, name, type, location, owner, criticality)
const ASSETS: &[(&str, &str, AssetType, &str, &str, Severity)] = &[
    ("SRV-001", "Production Web Server", AssetType::Server, "Data Center A - Rack 12", "IT Operations", Severity::Critical),
    ("DB-001", "Customer Database", AssetType::Database, "Cloud - AWS US-East-1", "Database Team", Severity::Critical),
    ("CLD-001", "S3 Backup Storage", AssetType::CloudResource, "AWS US-West-2", "DevOps", Severity::High),
    ("NET-001", "Core Router", AssetType::NetworkDevice, "Data Center A - Network Room", "Network Team", Severity::Critical),
    ("EP-001", "Employee Workstations", AssetType::Endpoint, "Office Floor 3", "IT Support", Severity::Medium),
    ("SRV-002", "Development Server", AssetType::Server, "Data Center B - Rack 5", "Development Team", Severity::Medium),
    ("DB-002", "Analytics Database", AssetType::Database, "Cloud - Azure East US", "Data Analytics", Severity::High),
    ("NET-002", "Firewall Appliance", AssetType::NetworkDevice, "Data Center A - DMZ", "Security Team", Severity::Critical),
];

// --- Relationships ---
const RELATIONSHIPS: &[(&str, &str, RelationshipKind)] = &[
    // Controls mitigate threats
    ("NIST-CSF-PR.AC-1", "T1078", RelationshipKind::Mitigates),
    ("NIST-CSF-DE.CM-1", "T1071", RelationshipKind::Mitigates),
    ("CIS-4.1", "T1190", RelationshipKind::Mitigates),
    ("NIST-CSF-RS.RP-1", "T1486", RelationshipKind::Mitigates),
    ("CIS-13.1", "T1059", RelationshipKind::Mitigates),
    // Threats exploit vulnerabilities
    ("T1190", "CVE-2024-1234", RelationshipKind::Exploits),
    ("T1078", "CVE-2024-1357", RelationshipKind::Exploits),
    ("T1068", "CVE-2024-2468", RelationshipKind::Exploits),
    ("T1566", "CVE-2023-9876", RelationshipKind::Exploits),
    // Vulnerabilities affect assets
    ("CVE-2024-1234", "SRV-001", RelationshipKind::Affects),
    ("CVE-2024-5678", "DB-001", RelationshipKind::Affects),
    ("CVE-2024-2468", "SRV-001", RelationshipKind::Affects),
    ("CVE-2024-1357", "NET-002", RelationshipKind::Affects),
    // Controls protect assets
    ("NIST-CSF-PR.AC-1", "SRV-001", RelationshipKind::Protects),
    ("CIS-4.1", "DB-001", RelationshipKind::Protects),
    ("NIST-CSF-DE.CM-1", "NET-001", RelationshipKind::Protects),
];

pub fn controls() -> Vec<Control> {
    CONTROLS
        .iter()
        .map(|&(id, name, description, framework, category, implemented)| Control {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            framework: framework.to_string(),
            category: category.to_string(),
            implemented,
        })
        .collect()
}

pub fn threats() -> Vec<Threat> {
    THREATS
        .iter()
        .map(|&(id, tactic, technique, description, severity)| Threat {
            id: id.to_string(),
            tactic: tactic.to_string(),
            technique: technique.to_string(),
            description: description.to_string(),
            mitre_id: id.to_string(),
            severity,
        })
        .collect()
}

pub fn vulnerabilities() -> Vec<Vulnerability> {
    VULNERABILITIES
        .iter()
        .map(
            |&(id, cve_id, description, severity, cvss_score, product, status)| Vulnerability {
                id: id.to_string(),
                cve_id: cve_id.to_string(),
                description: description.to_string(),
                severity,
                cvss_score,
                affected_product: product.to_string(),
                status,
            },
        )
        .collect()
}

/// Every bundled asset is in service.
pub fn assets() -> Vec<Asset> {
    ASSETS
        .iter()
        .map(|&(id, name, asset_type, location, owner, criticality)| Asset {
            id: id.to_string(),
            name: name.to_string(),
            asset_type,
            location: location.to_string(),
            owner: owner.to_string(),
            criticality,
            status: AssetStatus::Active,
        })
        .collect()
}

pub fn relationships() -> Vec<Relationship> {
    RELATIONSHIPS
        .iter()
        .map(|&(source, target, kind)| Relationship {
            source: source.to_string(),
            target: target.to_string(),
            kind,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn bundled_ids_are_unique() {
        let controls: HashSet<_> = controls().into_iter().map(|c| c.id).collect();
        let threats: HashSet<_> = threats().into_iter().map(|t| t.id).collect();
        let vulns: HashSet<_> = vulnerabilities().into_iter().map(|v| v.cve_id).collect();
        let assets: HashSet<_> = assets().into_iter().map(|a| a.id).collect();
        assert_eq!((controls.len(), threats.len(), vulns.len(), assets.len()), (8, 8, 8, 8));
    }

    #[test]
    fn relationships_reference_known_entries() {
        let mut known: HashSet<String> = HashSet::new();
        known.extend(controls().into_iter().map(|c| c.id));
        known.extend(threats().into_iter().map(|t| t.mitre_id));
        known.extend(vulnerabilities().into_iter().map(|v| v.cve_id));
        known.extend(assets().into_iter().map(|a| a.id));
        for rel in relationships() {
            assert!(known.contains(&rel.source), "unknown source {}", rel.source);
            assert!(known.contains(&rel.target), "unknown target {}", rel.target);
        }
    }
}
