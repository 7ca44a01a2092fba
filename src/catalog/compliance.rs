// src/catalog/compliance.rs

use super::definitions::{Control, Severity, Threat, Vulnerability, VulnerabilityStatus};

pub const FRAMEWORKS: &[&str] = &["NIST CSF", "CIS Controls"];
pub const CSF_FUNCTIONS: &[&str] = &["Identify", "Protect", "Detect"];
pub const GOOD_THRESHOLD: u32 = 80;
const RECENT_ACTIVITY_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub done: usize,
    pub total: usize,
}

impl Ratio {
    fn count<'a>(controls: impl Iterator<Item = &'a Control>) -> Self {
        controls.fold(Ratio { done: 0, total: 0 }, |acc, c| Ratio {
            done: acc.done + usize::from(c.implemented),
            total: acc.total + 1,
        })
    }

    /// Rounded percentage; 0 when there is nothing to count.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            (self.done as f64 * 100.0 / self.total as f64).round() as u32
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceSummary {
    pub controls: Ratio,
    pub frameworks: Vec<(&'static str, Ratio)>,
    pub functions: Vec<(&'static str, Ratio)>,
    pub total_threats: usize,
    pub critical_threats: usize,
    pub total_vulnerabilities: usize,
    pub open_vulnerabilities: usize,
    pub critical_open_vulnerabilities: usize,
    /// Critical open CVEs shown as recent activity: `(cve id, affected product)`.
    pub recent_activity: Vec<(String, String)>,
}

impl ComplianceSummary {
    pub fn compute(controls: &[Control], threats: &[Threat], vulnerabilities: &[Vulnerability]) -> Self {
        let by_framework = |name: &'static str| {
            (name, Ratio::count(controls.iter().filter(|c| c.framework == name)))
        };
        let by_function = |name: &'static str| {
            (name, Ratio::count(controls.iter().filter(|c| c.category == name)))
        };

        let open: Vec<&Vulnerability> = vulnerabilities
            .iter()
            .filter(|v| v.status == VulnerabilityStatus::Open)
            .collect();
        let critical_open: Vec<&Vulnerability> = open
            .iter()
            .copied()
            .filter(|v| v.severity == Severity::Critical)
            .collect();

        Self {
            controls: Ratio::count(controls.iter()),
            frameworks: FRAMEWORKS.iter().map(|&f| by_framework(f)).collect(),
            functions: CSF_FUNCTIONS.iter().map(|&f| by_function(f)).collect(),
            total_threats: threats.len(),
            critical_threats: threats.iter().filter(|t| t.severity == Severity::Critical).count(),
            total_vulnerabilities: vulnerabilities.len(),
            open_vulnerabilities: open.len(),
            critical_open_vulnerabilities: critical_open.len(),
            recent_activity: critical_open
                .iter()
                .take(RECENT_ACTIVITY_LIMIT)
                .map(|v| (v.cve_id.clone(), v.affected_product.clone()))
                .collect(),
        }
    }

    pub fn compliance_percent(&self) -> u32 {
        self.controls.percent()
    }

    pub fn rating(&self) -> &'static str {
        if self.compliance_percent() >= GOOD_THRESHOLD {
            "Good"
        } else {
            "Needs Improvement"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock_data;

    #[test]
    fn bundled_catalogs_summary() {
        let summary = ComplianceSummary::compute(
            &mock_data::controls(),
            &mock_data::threats(),
            &mock_data::vulnerabilities(),
        );
        assert_eq!(summary.controls, Ratio { done: 5, total: 8 });
        assert_eq!(summary.compliance_percent(), 63);
        assert_eq!(summary.rating(), "Needs Improvement");
        assert_eq!(summary.frameworks[0], ("NIST CSF", Ratio { done: 4, total: 4 }));
        assert_eq!(summary.frameworks[1], ("CIS Controls", Ratio { done: 1, total: 4 }));
        assert_eq!(summary.critical_threats, 2);
        assert_eq!(summary.open_vulnerabilities, 3);
        assert_eq!(summary.critical_open_vulnerabilities, 2);
        let cves: Vec<_> = summary.recent_activity.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(cves, vec!["CVE-2024-1234", "CVE-2024-2468"]);
    }

    #[test]
    fn empty_catalogs_are_zero_percent() {
        let summary = ComplianceSummary::compute(&[], &[], &[]);
        assert_eq!(summary.compliance_percent(), 0);
        assert!(summary.functions.iter().all(|(_, r)| r.percent() == 0));
        assert!(summary.recent_activity.is_empty());
    }

    #[test]
    fn good_rating_at_threshold() {
        let mut controls = mock_data::controls();
        controls.truncate(5);
        let summary = ComplianceSummary::compute(&controls, &[], &[]);
        assert_eq!(summary.controls, Ratio { done: 4, total: 5 });
        assert_eq!(summary.rating(), "Good");
    }
}
