// src/catalog/relationship_map.rs

use super::definitions::{Asset, Control, Relationship, RelationshipKind, Threat, Vulnerability};

const PER_LANE: usize = 4;
const LANE_X: [f32; 4] = [50.0, 300.0, 550.0, 800.0];
const TOP: f32 = 100.0;
const SPACING: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeLane {
    Control,
    Threat,
    Vulnerability,
    Asset,
}

impl NodeLane {
    fn x(self) -> f32 {
        match self {
            NodeLane::Control => LANE_X[0],
            NodeLane::Threat => LANE_X[1],
            NodeLane::Vulnerability => LANE_X[2],
            NodeLane::Asset => LANE_X[3],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeLane::Control => "control",
            NodeLane::Threat => "threat",
            NodeLane::Vulnerability => "vulnerability",
            NodeLane::Asset => "asset",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapNode {
    pub id: String,
    pub lane: NodeLane,
    pub title: String,
    pub subtitle: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEdge {
    pub source: usize,
    pub target: usize,
    pub kind: RelationshipKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipMap {
    pub nodes: Vec<MapNode>,
    pub edges: Vec<MapEdge>,
}

impl RelationshipMap {
    pub fn build(
        controls: &[Control],
        threats: &[Threat],
        vulnerabilities: &[Vulnerability],
        assets: &[Asset],
        relationships: &[Relationship],
    ) -> Self {
        let mut nodes = Vec::new();
        push_lane(&mut nodes, NodeLane::Control, controls, |c| {
            (c.id.clone(), c.id.clone(), c.name.clone())
        });
        push_lane(&mut nodes, NodeLane::Threat, threats, |t| {
            (t.id.clone(), t.mitre_id.clone(), t.technique.clone())
        });
        push_lane(&mut nodes, NodeLane::Vulnerability, vulnerabilities, |v| {
            (v.cve_id.clone(), v.cve_id.clone(), v.severity.as_str().to_string())
        });
        push_lane(&mut nodes, NodeLane::Asset, assets, |a| {
            (a.id.clone(), a.id.clone(), a.name.clone())
        });

        let position = |id: &str| nodes.iter().position(|n| n.id == id);
        let edges = relationships
            .iter()
            .filter_map(|rel| {
                Some(MapEdge {
                    source: position(&rel.source)?,
                    target: position(&rel.target)?,
                    kind: rel.kind,
                })
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn node_at(&self, x: f32, y: f32, width: f32, height: f32) -> Option<&MapNode> {
        self.nodes
            .iter()
            .find(|n| x >= n.x && x <= n.x + width && y >= n.y && y <= n.y + height)
    }
}

fn push_lane<T>(
    nodes: &mut Vec<MapNode>,
    lane: NodeLane,
    items: &[T],
    describe: impl Fn(&T) -> (String, String, String),
) {
    for (i, item) in items.iter().take(PER_LANE).enumerate() {
        let (id, title, subtitle) = describe(item);
        nodes.push(MapNode {
            id,
            lane,
            title,
            subtitle,
            x: lane.x(),
            y: TOP + i as f32 * SPACING,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock_data;

    fn bundled() -> RelationshipMap {
        RelationshipMap::build(
            &mock_data::controls(),
            &mock_data::threats(),
            &mock_data::vulnerabilities(),
            &mock_data::assets(),
            &mock_data::relationships(),
        )
    }

    #[test]
    fn four_nodes_per_lane_in_columns() {
        let map = bundled();
        assert_eq!(map.nodes.len(), 16);
        let vuln = map.nodes.iter().find(|n| n.id == "CVE-2024-2468").unwrap();
        assert_eq!((vuln.x, vuln.y), (550.0, 460.0));
        let first = &map.nodes[0];
        assert_eq!((first.id.as_str(), first.x, first.y), ("NIST-CSF-ID.AM-1", 50.0, 100.0));
    }

    #[test]
    fn edges_only_between_present_nodes() {
        let map = bundled();
        // T1059 and CIS-13.1 fall outside the first four of their lanes.
        let pairs: Vec<(&str, &str)> = map
            .edges
            .iter()
            .map(|e| (map.nodes[e.source].id.as_str(), map.nodes[e.target].id.as_str()))
            .collect();
        assert!(!pairs.contains(&("CIS-13.1", "T1059")));
        assert!(pairs.contains(&("T1190", "CVE-2024-1234")));
        assert!(pairs.contains(&("CIS-4.1", "DB-001")));
        assert!(map.edges.iter().all(|e| e.source < 16 && e.target < 16));
    }

    #[test]
    fn empty_catalogs_yield_empty_map() {
        let map = RelationshipMap::build(&[], &[], &[], &[], &mock_data::relationships());
        assert!(map.nodes.is_empty());
        assert!(map.edges.is_empty());
    }

    #[test]
    fn hit_testing() {
        let map = bundled();
        assert_eq!(map.node_at(60.0, 110.0, 150.0, 60.0).map(|n| n.id.as_str()), Some("NIST-CSF-ID.AM-1"));
        assert!(map.node_at(0.0, 0.0, 150.0, 60.0).is_none());
    }
}
