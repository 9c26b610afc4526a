use crate::theme;
use drakonomi_core::DragonId;
use drakonomi_graph::style;
use drakonomi_graph::{Camera, ForceLayout, GraphSnapshot, HighlightState, SelectionState, Vec2};
use eframe::egui;
use std::collections::HashMap;

// Responsibility checklist for the bubble canvas:
// - Edges (weight-scaled stroke + flow particles), then bubbles on top
// - Bubble fill: circle-masked artwork when ready, solid color otherwise
// - Selection dimming, highlight glow, labels above the zoom threshold
// - Hover hit test, click-to-select, drag-to-pin, pan/zoom camera

pub struct CanvasOutput {
    /// Node whose selection should toggle.
    pub clicked: Option<DragonId>,
    /// Node whose detail view should open (double click).
    pub opened: Option<DragonId>,
    pub hovered: Option<DragonId>,
}

enum DragKind {
    Node(DragonId),
    Pan {
        start_pan: Vec2,
        start_pos: egui::Pos2,
    },
}

pub struct BubbleCanvas {
    camera: Camera,
    drag: Option<DragKind>,
}

impl BubbleCanvas {
    pub fn new() -> Self {
        Self {
            camera: Camera::new(),
            drag: None,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn reset_view(&mut self) {
        self.camera = Camera::new();
    }

    #[allow(clippy::too_many_arguments)]
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        snapshot: &GraphSnapshot,
        layout: &mut ForceLayout,
        selection: &SelectionState,
        highlight: &HighlightState,
        textures: &HashMap<DragonId, egui::TextureHandle>,
        particles: bool,
        time: f64,
    ) -> CanvasOutput {
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, theme::palette::CANVAS);
        let viewport_center = from_pos2(rect.center());

        let zoom_delta = ui.input(|i| i.zoom_delta());
        if response.hovered() && (zoom_delta - 1.0).abs() > f32::EPSILON {
            if let Some(pointer) = response.hover_pos() {
                self.camera
                    .zoom_by(zoom_delta, from_pos2(pointer), viewport_center);
            }
        }

        let zoom = self.camera.zoom;
        let screen: HashMap<DragonId, egui::Pos2> = layout
            .positions()
            .map(|(id, pos)| (id, to_pos2(self.camera.graph_to_screen(pos, viewport_center))))
            .collect();

        // Topmost bubble under the pointer; nodes are drawn in snapshot
        // order, so walk it backwards.
        let mut hovered = None;
        if let Some(pointer) = response.hover_pos() {
            for node in snapshot.nodes.iter().rev() {
                if let Some(center) = screen.get(&node.id) {
                    if center.distance(pointer) <= node.radius * zoom {
                        hovered = Some(node.id);
                        break;
                    }
                }
            }
        }

        if response.drag_started() {
            self.drag = match (hovered, response.interact_pointer_pos()) {
                (Some(id), _) => Some(DragKind::Node(id)),
                (None, Some(pos)) => Some(DragKind::Pan {
                    start_pan: self.camera.pan,
                    start_pos: pos,
                }),
                _ => None,
            };
        }
        if response.dragged() {
            if let Some(pointer) = response.interact_pointer_pos() {
                match &self.drag {
                    Some(DragKind::Node(id)) => {
                        let graph = self
                            .camera
                            .screen_to_graph(from_pos2(pointer), viewport_center);
                        layout.drag_to(*id, graph);
                    }
                    Some(DragKind::Pan {
                        start_pan,
                        start_pos,
                    }) => {
                        self.camera.pan = *start_pan
                            + Vec2::new(pointer.x - start_pos.x, pointer.y - start_pos.y);
                    }
                    None => {}
                }
            }
        }
        if response.drag_stopped() {
            if matches!(self.drag, Some(DragKind::Node(_))) {
                layout.release_drag();
            }
            self.drag = None;
        }

        let mut clicked = None;
        let mut opened = None;
        if response.double_clicked() {
            opened = hovered;
        } else if response.clicked() {
            clicked = hovered;
        }

        for edge in &snapshot.edges {
            let (Some(&a), Some(&b)) = (screen.get(&edge.source), screen.get(&edge.target))
            else {
                continue;
            };
            let color = theme::color32(style::edge_color(edge.weight));
            painter.line_segment(
                [a, b],
                egui::Stroke::new(style::edge_width(edge.weight) * zoom, color),
            );
            if particles {
                draw_flow_particles(&painter, a, b, edge.weight, time);
            }
        }

        let selection_active = !selection.is_empty();
        for node in &snapshot.nodes {
            let Some(&center) = screen.get(&node.id) else {
                continue;
            };
            let radius = node.radius * zoom;
            if !rect.expand(radius + 40.0).contains(center) {
                continue;
            }

            let color = theme::color32(node.color);
            let opacity = style::node_opacity(selection_active, selection.is_selected(node.id));
            let is_highlighted = highlight.is_highlighted(&node.tags);

            if is_highlighted {
                let glow = theme::color32(node.color.with_alpha(style::GLOW_RING_ALPHA))
                    .gamma_multiply(opacity);
                painter.circle_stroke(
                    center,
                    radius + style::GLOW_RING_OFFSET * zoom,
                    egui::Stroke::new(style::GLOW_RING_WIDTH, glow),
                );
            }

            match textures.get(&node.id) {
                Some(texture) => {
                    let size = egui::vec2(radius * 2.0, radius * 2.0);
                    painter.image(
                        texture.id(),
                        egui::Rect::from_center_size(center, size),
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE.gamma_multiply(opacity),
                    );
                }
                None => {
                    painter.circle_filled(center, radius, color.gamma_multiply(opacity));
                }
            }

            painter.circle_stroke(
                center,
                radius,
                egui::Stroke::new(
                    style::node_border_width(is_highlighted),
                    color.gamma_multiply(opacity),
                ),
            );

            if style::label_visible(zoom) {
                painter.text(
                    center + egui::vec2(0.0, radius + style::LABEL_GAP * zoom),
                    egui::Align2::CENTER_TOP,
                    &node.display_name,
                    egui::FontId::proportional(style::LABEL_FONT_SIZE),
                    theme::palette::ACCENT.gamma_multiply(opacity),
                );
            }
        }

        if let Some(node) = hovered.and_then(|id| snapshot.node(id)) {
            response.on_hover_text(format!(
                "{}\n{}",
                node.display_name,
                node.tags.join(", ")
            ));
        }

        CanvasOutput {
            clicked,
            opened,
            hovered,
        }
    }
}

impl Default for BubbleCanvas {
    fn default() -> Self {
        Self::new()
    }
}

/// Directional flow particles along an edge, count scaled by weight.
fn draw_flow_particles(painter: &egui::Painter, a: egui::Pos2, b: egui::Pos2, weight: f32, time: f64) {
    let count = style::edge_particles(weight);
    if count == 0 {
        return;
    }
    // PARTICLE_SPEED is edge-lengths per frame at a nominal 60 fps.
    let phase = (time * f64::from(style::PARTICLE_SPEED) * 60.0).fract() as f32;
    let color = theme::palette::ACCENT.gamma_multiply(0.7);
    for k in 0..count {
        let t = (phase + k as f32 / count as f32).fract();
        let pos = a + (b - a) * t;
        painter.circle_filled(pos, style::PARTICLE_WIDTH / 2.0, color);
    }
}

fn to_pos2(v: Vec2) -> egui::Pos2 {
    egui::pos2(v.x, v.y)
}

fn from_pos2(p: egui::Pos2) -> Vec2 {
    Vec2::new(p.x, p.y)
}
