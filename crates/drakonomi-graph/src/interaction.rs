//! Selection, highlight, and camera state.
//!
//! All of it is a read-time overlay over the graph snapshot: toggling any
//! of this triggers a redraw, never a graph rebuild or a simulation
//! reheat.

use crate::Vec2;
use drakonomi_core::DragonId;
use std::collections::HashSet;

/// The selection holds at most this many nodes.
pub const MAX_SELECTED: usize = 3;

/// Bounded, ordered multi-selection. Insertion order is selection order;
/// overflowing evicts the oldest entry (FIFO), while re-selecting an
/// already-selected id removes exactly that id (toggle). Those are two
/// distinct paths, both covered by tests.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    ids: Vec<DragonId>,
}

impl SelectionState {
    pub fn toggle(&mut self, id: DragonId) {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
            return;
        }
        self.ids.push(id);
        if self.ids.len() > MAX_SELECTED {
            self.ids.remove(0);
        }
    }

    pub fn remove(&mut self, id: DragonId) {
        self.ids.retain(|&s| s != id);
    }

    /// Drop selected ids no longer present in the active entity list;
    /// filtering must not otherwise disturb the selection.
    pub fn retain_present(&mut self, present: &HashSet<DragonId>) {
        self.ids.retain(|id| present.contains(id));
    }

    pub fn is_selected(&self, id: DragonId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Selected ids in selection order, oldest first.
    pub fn ids(&self) -> &[DragonId] {
        &self.ids
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Active tag filters. A node is highlighted iff its tag set intersects
/// this set; with no active tags nothing is highlighted.
#[derive(Debug, Clone, Default)]
pub struct HighlightState {
    tags: HashSet<String>,
}

impl HighlightState {
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    pub fn is_active(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_highlighted(&self, tags: &[String]) -> bool {
        !self.tags.is_empty() && tags.iter().any(|t| self.tags.contains(t))
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }
}

/// View transform between graph space and screen space. Pure view state;
/// the physics simulation never sees it.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Camera {
    pub const MIN_ZOOM: f32 = 0.3;
    pub const MAX_ZOOM: f32 = 3.0;

    pub fn new() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }

    pub fn graph_to_screen(&self, graph: Vec2, viewport_center: Vec2) -> Vec2 {
        viewport_center + self.pan + graph * self.zoom
    }

    pub fn screen_to_graph(&self, screen: Vec2, viewport_center: Vec2) -> Vec2 {
        let offset = screen - viewport_center - self.pan;
        Vec2::new(offset.x / self.zoom, offset.y / self.zoom)
    }

    /// Multiply the zoom by `factor`, clamped, keeping the graph point
    /// under `anchor` (screen space) fixed.
    pub fn zoom_by(&mut self, factor: f32, anchor: Vec2, viewport_center: Vec2) {
        if factor <= 0.0 {
            return;
        }
        let prev = self.zoom;
        let next = (self.zoom * factor).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
        if (next - prev).abs() <= f32::EPSILON {
            return;
        }
        let graph_anchor = self.screen_to_graph(anchor, viewport_center);
        self.zoom = next;
        let moved = self.graph_to_screen(graph_anchor, viewport_center);
        self.pan += anchor - moved;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_selection_toggle_and_fifo_eviction() {
        let mut selection = SelectionState::default();

        // click 1 -> [1], click 2 -> [1,2], click 3 -> [1,2,3]
        selection.toggle(DragonId(1));
        selection.toggle(DragonId(2));
        selection.toggle(DragonId(3));
        assert_eq!(selection.ids(), &[DragonId(1), DragonId(2), DragonId(3)]);

        // click 1 again: toggle-off removes 1 (not an eviction).
        selection.toggle(DragonId(1));
        assert_eq!(selection.ids(), &[DragonId(2), DragonId(3)]);

        // Refill, then a 4th distinct click evicts exactly the oldest.
        selection.toggle(DragonId(1));
        selection.toggle(DragonId(4));
        assert_eq!(selection.ids(), &[DragonId(3), DragonId(1), DragonId(4)]);
    }

    #[test]
    fn test_selection_retain_present() {
        let mut selection = SelectionState::default();
        selection.toggle(DragonId(1));
        selection.toggle(DragonId(2));
        selection.toggle(DragonId(3));

        let present: HashSet<DragonId> = [DragonId(2)].into_iter().collect();
        selection.retain_present(&present);
        assert_eq!(selection.ids(), &[DragonId(2)]);
    }

    #[test]
    fn test_highlight_intersection() {
        let mut highlight = HighlightState::default();
        let tags = |list: &[&str]| -> Vec<String> { list.iter().map(|t| t.to_string()).collect() };

        assert!(!highlight.is_highlighted(&tags(&["fire"])));

        highlight.toggle_tag("fire");
        assert!(highlight.is_active());
        assert!(highlight.is_highlighted(&tags(&["fire", "ancient"])));
        assert!(highlight.is_highlighted(&tags(&["fire", "legendary"])));
        assert!(!highlight.is_highlighted(&tags(&["ice"])));
        assert!(!highlight.is_highlighted(&[]));

        highlight.toggle_tag("fire");
        assert!(!highlight.is_active());
        assert!(!highlight.is_highlighted(&tags(&["fire"])));
    }

    #[test]
    fn test_camera_zoom_clamps_and_anchors() {
        let center = Vec2::new(400.0, 300.0);
        let mut camera = Camera::new();

        camera.zoom_by(100.0, center, center);
        assert_eq!(camera.zoom, Camera::MAX_ZOOM);
        camera.zoom_by(1e-6, center, center);
        assert_eq!(camera.zoom, Camera::MIN_ZOOM);

        // The graph point under the anchor survives a zoom.
        let mut camera = Camera::new();
        camera.pan_by(Vec2::new(25.0, -40.0));
        let anchor = Vec2::new(520.0, 180.0);
        let before = camera.screen_to_graph(anchor, center);
        camera.zoom_by(1.7, anchor, center);
        let after = camera.screen_to_graph(anchor, center);
        assert!(before.distance(after) < 1e-3);
    }

    proptest! {
        /// The queue never exceeds its bound, whatever the click stream.
        #[test]
        fn prop_selection_never_exceeds_cap(clicks in proptest::collection::vec(0u64..10, 0..64)) {
            let mut selection = SelectionState::default();
            for click in clicks {
                selection.toggle(DragonId(click));
                prop_assert!(selection.len() <= MAX_SELECTED);

                // No duplicates at any point.
                let unique: HashSet<_> = selection.ids().iter().collect();
                prop_assert_eq!(unique.len(), selection.len());
            }
        }
    }
}
