use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a catalog record. Assigned once when the catalog is
/// loaded and never reused within a session; all cross-crate references
/// (graph nodes, selection, favorites) key on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DragonId(pub u64);

impl fmt::Display for DragonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for DragonId {
    fn default() -> Self {
        DragonId(0)
    }
}

/// A catalog record. Immutable from the visualization's perspective;
/// identity is `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dragon {
    #[serde(default)]
    pub id: DragonId,
    pub name: String,
    pub origin: String,
    #[serde(default)]
    pub common_names: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// A record with no tags still renders (default color, no similarity
    /// edges); treat missing as empty rather than rejecting the record.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Dragon {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Shared-tag count with another record, by exact string match.
    pub fn shared_tag_count(&self, other: &Dragon) -> usize {
        self.tags.iter().filter(|t| other.tags.contains(t)).count()
    }
}
