//! The entity source backing the visualization: an in-memory catalog of
//! dragon records with the query surface the rest of the application
//! consumes (`list_all`, `search`, `get_by_id`, `get_related`).

use drakonomi_core::{Dragon, DragonId};
use std::collections::HashMap;
use thiserror::Error;

const SEED_JSON: &str = include_str!("../assets/dragons.json");

/// Search results are capped so a broad term cannot flood the view.
const SEARCH_RESULT_CAP: usize = 50;
/// Terms shorter than this are not searched; callers treat them as
/// "no filter".
pub const MIN_SEARCH_LEN: usize = 2;
/// Default cap for [`Catalog::get_related`].
pub const DEFAULT_RELATED_LIMIT: usize = 6;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to parse embedded seed data: {0}")]
    Seed(#[from] serde_json::Error),
}

pub struct Catalog {
    dragons: Vec<Dragon>,
    by_id: HashMap<DragonId, usize>,
}

impl Catalog {
    /// Load the embedded seed catalog.
    pub fn from_seed() -> Result<Self, CatalogError> {
        let records: Vec<Dragon> = serde_json::from_str(SEED_JSON)?;
        tracing::info!(count = records.len(), "loaded seed catalog");
        Ok(Self::from_records(records))
    }

    /// Build a catalog from raw records, assigning stable sequential ids
    /// (1-based). Ids are valid for the lifetime of this catalog.
    pub fn from_records(mut records: Vec<Dragon>) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        for (i, dragon) in records.iter_mut().enumerate() {
            dragon.id = DragonId(i as u64 + 1);
            by_id.insert(dragon.id, i);
        }
        Self {
            dragons: records,
            by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.dragons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dragons.is_empty()
    }

    /// Every record, in catalog order.
    pub fn list_all(&self) -> &[Dragon] {
        &self.dragons
    }

    pub fn get_by_id(&self, id: DragonId) -> Option<&Dragon> {
        self.by_id.get(&id).map(|&i| &self.dragons[i])
    }

    /// Case-insensitive substring search over name, common names, origin,
    /// tags, and description. Terms under [`MIN_SEARCH_LEN`] characters
    /// return nothing; results are capped at 50.
    pub fn search(&self, term: &str) -> Vec<&Dragon> {
        let needle = term.trim().to_lowercase();
        if needle.chars().count() < MIN_SEARCH_LEN {
            return Vec::new();
        }

        self.dragons
            .iter()
            .filter(|d| Self::matches(d, &needle))
            .take(SEARCH_RESULT_CAP)
            .collect()
    }

    /// Records sharing at least one tag with `id`, excluding the record
    /// itself, in catalog order, capped at `limit`.
    pub fn get_related(&self, id: DragonId, limit: usize) -> Vec<&Dragon> {
        let Some(dragon) = self.get_by_id(id) else {
            return Vec::new();
        };

        self.dragons
            .iter()
            .filter(|d| d.id != id && d.shared_tag_count(dragon) > 0)
            .take(limit)
            .collect()
    }

    fn matches(dragon: &Dragon, needle: &str) -> bool {
        if dragon.name.to_lowercase().contains(needle) {
            return true;
        }
        if dragon
            .common_names
            .iter()
            .any(|n| n.to_lowercase().contains(needle))
        {
            return true;
        }
        if dragon.origin.to_lowercase().contains(needle) {
            return true;
        }
        if dragon.tags.iter().any(|t| t.to_lowercase().contains(needle)) {
            return true;
        }
        dragon.description.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, origin: &str, tags: &[&str]) -> Dragon {
        Dragon {
            id: DragonId(0),
            name: name.to_string(),
            origin: origin.to_string(),
            common_names: Vec::new(),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image_url: None,
        }
    }

    #[test]
    fn test_seed_catalog_loads() {
        let catalog = Catalog::from_seed().unwrap();
        assert_eq!(catalog.len(), 30);

        // Every record has a unique id and resolves back through get_by_id.
        for dragon in catalog.list_all() {
            assert_eq!(catalog.get_by_id(dragon.id).unwrap().name, dragon.name);
        }
    }

    #[test]
    fn test_short_terms_return_nothing() {
        let catalog = Catalog::from_seed().unwrap();
        assert!(catalog.search("").is_empty());
        assert!(catalog.search("f").is_empty());
        assert!(catalog.search("  f  ").is_empty());
        assert!(!catalog.search("fa").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = Catalog::from_seed().unwrap();

        let by_name = catalog.search("SMAUG");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Smaug");

        // "nordic" only appears as a tag.
        let by_tag = catalog.search("nordic");
        assert!(by_tag.iter().all(|d| d.has_tag("nordic")));
        assert_eq!(by_tag.len(), 2);

        // Origin field participates too.
        let by_origin = catalog.search("norse myth");
        assert_eq!(by_origin.len(), 2);
    }

    #[test]
    fn test_search_matches_common_names() {
        let catalog = Catalog::from_seed().unwrap();
        let hits = catalog.search("midgard");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Jörmungandr");
    }

    #[test]
    fn test_search_cap() {
        let records = (0..80)
            .map(|i| record(&format!("Wyrmling {i}"), "Test Roost", &["wyrm"]))
            .collect();
        let catalog = Catalog::from_records(records);
        assert_eq!(catalog.search("wyrmling").len(), 50);
    }

    #[test]
    fn test_get_related_shares_a_tag_and_excludes_self() {
        let catalog = Catalog::from_records(vec![
            record("A", "", &["fire", "ancient"]),
            record("B", "", &["fire"]),
            record("C", "", &["ice"]),
            record("D", "", &["ancient", "ice"]),
        ]);
        let a = catalog.list_all()[0].id;

        let related = catalog.get_related(a, DEFAULT_RELATED_LIMIT);
        let names: Vec<_> = related.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["B", "D"]);
    }

    #[test]
    fn test_get_related_respects_limit_and_unknown_id() {
        let records = (0..10)
            .map(|i| record(&format!("W{i}"), "", &["wyrm"]))
            .collect();
        let catalog = Catalog::from_records(records);
        let first = catalog.list_all()[0].id;

        assert_eq!(catalog.get_related(first, 3).len(), 3);
        assert!(catalog.get_related(DragonId(999), 3).is_empty());
    }
}
