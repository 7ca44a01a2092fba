// src/cli/sync.rs
use super::CliError;
use crate::catalog::feeds::{self, FeedKind, FetchedCatalog};
use crate::settings::AppSettings;

const PREVIEW_ROWS: usize = 20;

pub fn run(feed: &str, settings: &AppSettings) -> Result<(), CliError> {
    let kind: FeedKind = feed.parse()?;
    println!("Fetching {}...\n", kind);
    let payload = feeds::fetch_blocking(kind, &settings.feed_endpoints())?;

    let rows: Vec<(String, String)> = match &payload.catalog {
        FetchedCatalog::Controls(items) => items.iter().map(|c| (c.id.clone(), c.name.clone())).collect(),
        FetchedCatalog::Threats(items) => items
            .iter()
            .map(|t| (t.mitre_id.clone(), format!("{} [{}]", t.technique, t.tactic)))
            .collect(),
        FetchedCatalog::Vulnerabilities(items) => items
            .iter()
            .map(|v| (v.cve_id.clone(), format!("{:.1} {}", v.cvss_score, v.affected_product)))
            .collect(),
    };

    for (id, title) in rows.iter().take(PREVIEW_ROWS) {
        println!("  {:<24} {}", id, title);
    }
    if rows.len() > PREVIEW_ROWS {
        println!("  ... and {} more", rows.len() - PREVIEW_ROWS);
    }
    println!(
        "\nFetched {} {} at {}",
        payload.catalog.len(),
        kind,
        payload.fetched_at.to_rfc3339()
    );
    Ok(())
}
