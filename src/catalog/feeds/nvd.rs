// src/catalog/feeds/nvd.rs

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::FeedError;
use crate::catalog::definitions::{Severity, Vulnerability, VulnerabilityStatus};

const FEED: &str = "NVD";

#[derive(Deserialize)]
struct NvdResponse {
    #[serde(default)]
    vulnerabilities: Vec<NvdItem>,
}

#[derive(Deserialize)]
struct NvdItem {
    cve: NvdCve,
}

#[derive(Deserialize)]
struct NvdCve {
    id: String,
    #[serde(default)]
    descriptions: Vec<LangString>,
    #[serde(default)]
    metrics: NvdMetrics,
    #[serde(default)]
    configurations: Vec<NvdConfiguration>,
}

#[derive(Deserialize)]
struct LangString {
    lang: String,
    value: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct NvdMetrics {
    #[serde(default)]
    cvss_metric_v31: Vec<CvssMetric>,
    #[serde(default)]
    cvss_metric_v30: Vec<CvssMetric>,
    #[serde(default)]
    cvss_metric_v2: Vec<CvssMetric>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CvssMetric {
    cvss_data: CvssData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CvssData {
    #[serde(default)]
    base_score: f64,
}

#[derive(Deserialize)]
struct NvdConfiguration {
    #[serde(default)]
    nodes: Vec<NvdNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NvdNode {
    #[serde(default)]
    cpe_match: Vec<CpeMatch>,
}

#[derive(Deserialize)]
struct CpeMatch {
    #[serde(default)]
    criteria: String,
}

/// Query URL for CVEs published in the `days` before `now`.
pub fn request_url(base: &str, now: DateTime<Utc>, days: i64, results: u32) -> String {
    let start = (now - Duration::days(days)).format("%Y-%m-%d");
    let end = now.format("%Y-%m-%d");
    format!(
        "{base}?pubStartDate={start}T00:00:00.000&pubEndDate={end}T23:59:59.999&resultsPerPage={results}"
    )
}

/// Reshapes an NVD CVE 2.0 response. Fetched CVEs have no remediation
/// state yet and are reported as open.
pub fn parse_cves(body: &str) -> Result<Vec<Vulnerability>, FeedError> {
    let response: NvdResponse = serde_json::from_str(body).map_err(|e| FeedError::parse(FEED, e))?;

    Ok(response
        .vulnerabilities
        .into_iter()
        .map(|item| {
            let cve = item.cve;
            let cvss_score = base_score(&cve.metrics);
            Vulnerability {
                description: cve
                    .descriptions
                    .iter()
                    .find(|d| d.lang == "en")
                    .map(|d| d.value.clone())
                    .unwrap_or_else(|| "No description available".to_string()),
                affected_product: affected_product(&cve.configurations),
                severity: Severity::from_cvss(cvss_score),
                cvss_score,
                status: VulnerabilityStatus::Open,
                id: cve.id.clone(),
                cve_id: cve.id,
            }
        })
        .collect())
}

fn base_score(metrics: &NvdMetrics) -> f64 {
    metrics
        .cvss_metric_v31
        .first()
        .or_else(|| metrics.cvss_metric_v30.first())
        .or_else(|| metrics.cvss_metric_v2.first())
        .map(|m| m.cvss_data.base_score)
        .unwrap_or(0.0)
}

/// Product field of the first CPE 2.3 match, e.g. `cpe:2.3:a:vendor:product:...`.
fn affected_product(configurations: &[NvdConfiguration]) -> String {
    configurations
        .first()
        .and_then(|c| c.nodes.first())
        .and_then(|n| n.cpe_match.first())
        .and_then(|m| m.criteria.split(':').nth(4))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "Various Products".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn url_covers_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let url = request_url("https://nvd.example/cves", now, 30, 50);
        assert_eq!(
            url,
            "https://nvd.example/cves?pubStartDate=2024-03-01T00:00:00.000&pubEndDate=2024-03-31T23:59:59.999&resultsPerPage=50"
        );
    }

    #[test]
    fn reshapes_cves() {
        let body = json!({ "vulnerabilities": [
            { "cve": {
                "id": "CVE-2024-0001",
                "descriptions": [{ "lang": "es", "value": "hola" }, { "lang": "en", "value": "Overflow." }],
                "metrics": {
                    "cvssMetricV30": [{ "cvssData": { "baseScore": 5.0 } }],
                    "cvssMetricV31": [{ "cvssData": { "baseScore": 9.1 } }]
                },
                "configurations": [{ "nodes": [{ "cpeMatch": [
                    { "criteria": "cpe:2.3:a:acme:rocket_sled:1.0:*:*:*:*:*:*:*" }
                ] }] }]
            } },
            { "cve": {
                "id": "CVE-2024-0002",
                "metrics": { "cvssMetricV2": [{ "cvssData": { "baseScore": 4.3 } }] }
            } },
            { "cve": { "id": "CVE-2024-0003" } }
        ] })
        .to_string();

        let vulns = parse_cves(&body).unwrap();
        assert_eq!(vulns.len(), 3);

        assert_eq!(vulns[0].cvss_score, 9.1);
        assert_eq!(vulns[0].severity, Severity::Critical);
        assert_eq!(vulns[0].description, "Overflow.");
        assert_eq!(vulns[0].affected_product, "rocket_sled");
        assert_eq!(vulns[0].id, vulns[0].cve_id);

        assert_eq!(vulns[1].severity, Severity::Medium);
        assert_eq!(vulns[1].affected_product, "Various Products");

        assert_eq!(vulns[2].cvss_score, 0.0);
        assert_eq!(vulns[2].severity, Severity::Low);
        assert_eq!(vulns[2].description, "No description available");
        assert!(vulns.iter().all(|v| v.status == VulnerabilityStatus::Open));
    }

    #[test]
    fn missing_list_is_empty() {
        assert!(parse_cves("{}").unwrap().is_empty());
    }
}
