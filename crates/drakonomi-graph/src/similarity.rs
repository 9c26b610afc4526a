//! Similarity graph construction.
//!
//! A pure function of the entity list: selection and highlight state are
//! applied as a read-time overlay by the canvas, never baked in here, so
//! rebuilding on UI interaction is unnecessary and layout state survives.

use crate::style::{self, Color};
use drakonomi_core::{Dragon, DragonId};
use std::collections::HashMap;

/// The closed cultural/origin tag set. Two records with no shared content
/// tag but a shared tag from this list still get a weak edge.
pub const CULTURAL_TAGS: &[&str] = &[
    "european", "asian", "chinese", "japanese", "nordic", "greek", "egyptian", "aztec", "indian",
    "welsh",
];

/// Weight of a cultural-origin edge; deliberately weaker than any
/// shared-tag edge.
pub const CULTURAL_EDGE_WEIGHT: f32 = 0.5;

const BASE_RADIUS: f32 = 22.0;
const TAG_BONUS_PER: f32 = 2.0;
const TAG_BONUS_CAP: f32 = 10.0;
const CONNECTION_BONUS_PER: f32 = 1.5;
const CONNECTION_BONUS_CAP: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: DragonId,
    pub display_name: String,
    pub color: Color,
    /// Bubble radius in graph units; always within
    /// `[BASE_RADIUS, BASE_RADIUS + 18]`.
    pub radius: f32,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub connection_count: usize,
}

/// Undirected similarity link, stored once per unordered pair with
/// `source < target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphEdge {
    pub source: DragonId,
    pub target: DragonId,
    pub weight: f32,
}

#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    index: HashMap<DragonId, usize>,
}

impl GraphSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: DragonId) -> Option<&GraphNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: DragonId) -> bool {
        self.index.contains_key(&id)
    }
}

/// Node radius from tag count and connection count; both bonuses are
/// capped so dense hubs stay legible.
pub fn node_radius(tag_count: usize, connection_count: usize) -> f32 {
    let tag_bonus = (tag_count as f32 * TAG_BONUS_PER).min(TAG_BONUS_CAP);
    let connection_bonus = (connection_count as f32 * CONNECTION_BONUS_PER).min(CONNECTION_BONUS_CAP);
    BASE_RADIUS + tag_bonus + connection_bonus
}

/// Build the similarity graph for an entity list.
///
/// Pairwise O(n²) comparison; fine for catalogs in the low hundreds,
/// which is this graph's intended scale. For each unordered pair the
/// shared-tag count (exact string match) decides the edge; only when it
/// is zero does the cultural-origin fallback apply, so a pair never gets
/// two edges and the weights are never combined.
pub fn build_graph(dragons: &[Dragon]) -> GraphSnapshot {
    let mut index = HashMap::with_capacity(dragons.len());
    let mut accepted: Vec<&Dragon> = Vec::with_capacity(dragons.len());
    for dragon in dragons {
        if index.contains_key(&dragon.id) {
            tracing::warn!(id = %dragon.id, name = %dragon.name, "duplicate entity id, skipping");
            continue;
        }
        index.insert(dragon.id, accepted.len());
        accepted.push(dragon);
    }

    // Edges first; node sizing needs the connection counts.
    let mut edges = Vec::new();
    let mut connections = vec![0usize; accepted.len()];
    for i in 0..accepted.len() {
        for j in (i + 1)..accepted.len() {
            if let Some(weight) = pair_weight(accepted[i], accepted[j]) {
                edges.push(GraphEdge {
                    source: accepted[i].id,
                    target: accepted[j].id,
                    weight,
                });
                connections[i] += 1;
                connections[j] += 1;
            }
        }
    }

    let nodes = accepted
        .iter()
        .zip(&connections)
        .map(|(dragon, &connection_count)| GraphNode {
            id: dragon.id,
            display_name: dragon.name.clone(),
            color: style::primary_color(&dragon.tags),
            radius: node_radius(dragon.tags.len(), connection_count),
            tags: dragon.tags.clone(),
            image_url: dragon.image_url.clone(),
            connection_count,
        })
        .collect();

    GraphSnapshot {
        nodes,
        edges,
        index,
    }
}

fn pair_weight(a: &Dragon, b: &Dragon) -> Option<f32> {
    let shared = a.shared_tag_count(b);
    if shared > 0 {
        return Some(shared as f32);
    }

    let cultural = |dragon: &Dragon| -> Vec<String> {
        dragon
            .tags
            .iter()
            .map(|t| t.to_lowercase())
            .filter(|t| CULTURAL_TAGS.contains(&t.as_str()))
            .collect()
    };

    let a_cultural = cultural(a);
    let b_cultural = cultural(b);
    if !a_cultural.is_empty() && a_cultural.iter().any(|t| b_cultural.contains(t)) {
        return Some(CULTURAL_EDGE_WEIGHT);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dragon(id: u64, tags: &[&str]) -> Dragon {
        Dragon {
            id: DragonId(id),
            name: format!("dragon-{id}"),
            origin: String::new(),
            common_names: Vec::new(),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image_url: None,
        }
    }

    fn edge_between(snapshot: &GraphSnapshot, a: u64, b: u64) -> Option<GraphEdge> {
        snapshot
            .edges
            .iter()
            .find(|e| {
                (e.source == DragonId(a) && e.target == DragonId(b))
                    || (e.source == DragonId(b) && e.target == DragonId(a))
            })
            .copied()
    }

    #[test]
    fn test_shared_tags_make_an_edge() {
        // The worked example: three entities, exactly one edge.
        let snapshot = build_graph(&[
            dragon(1, &["fire", "ancient"]),
            dragon(2, &["fire", "legendary"]),
            dragon(3, &["ice"]),
        ]);

        assert_eq!(snapshot.nodes.len(), 3);
        assert_eq!(snapshot.edges.len(), 1);
        let edge = edge_between(&snapshot, 1, 2).unwrap();
        assert_eq!(edge.weight, 1.0);
        assert!(edge_between(&snapshot, 1, 3).is_none());
        assert!(edge_between(&snapshot, 2, 3).is_none());
    }

    #[test]
    fn test_weight_counts_shared_tags() {
        let snapshot = build_graph(&[
            dragon(1, &["fire", "ancient", "treasure"]),
            dragon(2, &["fire", "ancient", "literary"]),
        ]);
        assert_eq!(edge_between(&snapshot, 1, 2).unwrap().weight, 2.0);
    }

    #[test]
    fn test_cultural_edge_only_without_shared_tags() {
        // A cultural tag shared verbatim counts as a shared tag, not as a
        // cultural edge.
        let snapshot = build_graph(&[
            dragon(1, &["nordic", "serpent"]),
            dragon(2, &["nordic", "death"]),
        ]);
        assert_eq!(edge_between(&snapshot, 1, 2).unwrap().weight, 1.0);

        // Distinct casing defeats the exact shared-tag match but not the
        // case-insensitive cultural match: the weak edge applies.
        let snapshot = build_graph(&[dragon(1, &["Nordic"]), dragon(2, &["nordic"])]);
        let edge = edge_between(&snapshot, 1, 2).unwrap();
        assert_eq!(edge.weight, CULTURAL_EDGE_WEIGHT);

        // Cultural tags that do not intersect give nothing.
        let snapshot = build_graph(&[dragon(1, &["nordic"]), dragon(2, &["greek"])]);
        assert!(snapshot.edges.is_empty());
    }

    #[test]
    fn test_shared_tag_precedence_over_cultural() {
        // Pair shares a content tag AND a cultural tag: only the
        // shared-tag edge exists, and the cultural weight is not added.
        let snapshot = build_graph(&[
            dragon(1, &["serpent", "nordic"]),
            dragon(2, &["serpent", "nordic"]),
        ]);
        assert_eq!(snapshot.edges.len(), 1);
        assert_eq!(edge_between(&snapshot, 1, 2).unwrap().weight, 2.0);
    }

    #[test]
    fn test_node_sizing_from_tags_and_connections() {
        let snapshot = build_graph(&[
            dragon(1, &["fire", "ancient"]),
            dragon(2, &["fire"]),
            dragon(3, &["ancient"]),
        ]);

        // Node 1 connects to both others.
        let hub = snapshot.node(DragonId(1)).unwrap();
        assert_eq!(hub.connection_count, 2);
        assert_eq!(hub.radius, 22.0 + 4.0 + 3.0);

        let leaf = snapshot.node(DragonId(2)).unwrap();
        assert_eq!(leaf.connection_count, 1);
        assert_eq!(leaf.radius, 22.0 + 2.0 + 1.5);
    }

    #[test]
    fn test_empty_and_tagless_inputs() {
        assert!(build_graph(&[]).is_empty());

        let snapshot = build_graph(&[dragon(1, &[]), dragon(2, &["fire"])]);
        assert_eq!(snapshot.nodes.len(), 2);
        assert!(snapshot.edges.is_empty());
        let bare = snapshot.node(DragonId(1)).unwrap();
        assert_eq!(bare.radius, 22.0);
        assert_eq!(bare.color, style::ACCENT);
    }

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let snapshot = build_graph(&[dragon(1, &["fire"]), dragon(1, &["ice"])]);
        assert_eq!(snapshot.nodes.len(), 1);
        assert_eq!(snapshot.node(DragonId(1)).unwrap().tags, vec!["fire"]);
    }

    proptest! {
        /// Radius stays inside the documented band and is monotone in
        /// both inputs.
        #[test]
        fn prop_radius_bounds_and_monotonicity(
            tag_count in 0usize..40,
            connection_count in 0usize..40,
        ) {
            let radius = node_radius(tag_count, connection_count);
            prop_assert!(radius >= 22.0);
            prop_assert!(radius <= 40.0);
            prop_assert!(node_radius(tag_count + 1, connection_count) >= radius);
            prop_assert!(node_radius(tag_count, connection_count + 1) >= radius);
        }

        /// At most one edge per unordered pair, all weights positive, and
        /// an edge exists only with a shared tag or intersecting cultural
        /// tags.
        #[test]
        fn prop_one_edge_per_pair(
            tag_picks in proptest::collection::vec(
                proptest::collection::vec(0usize..8, 0..5),
                2..12,
            )
        ) {
            let pool = ["fire", "ice", "serpent", "nordic", "greek", "ancient", "asian", "treasure"];
            let dragons: Vec<Dragon> = tag_picks
                .iter()
                .enumerate()
                .map(|(i, picks)| {
                    let mut tags: Vec<&str> = picks.iter().map(|&p| pool[p]).collect();
                    tags.sort_unstable();
                    tags.dedup();
                    dragon(i as u64 + 1, &tags)
                })
                .collect();

            let snapshot = build_graph(&dragons);

            let mut seen = std::collections::HashSet::new();
            for edge in &snapshot.edges {
                prop_assert!(edge.weight > 0.0);
                let key = if edge.source < edge.target {
                    (edge.source, edge.target)
                } else {
                    (edge.target, edge.source)
                };
                prop_assert!(seen.insert(key), "duplicate edge for {key:?}");
            }
        }
    }
}
