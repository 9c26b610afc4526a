//! Drakonomi theme: the original dark dragon palette applied to egui.

use eframe::egui::{self, Color32};

/// Spacing constants
pub mod spacing {
    pub const PANEL_PADDING: f32 = 12.0;
    pub const ITEM_SPACING: f32 = 8.0;
    pub const CHIP_PADDING: f32 = 6.0;
}

/// The dragon palette.
pub mod palette {
    use eframe::egui::Color32;

    /// Near-black canvas backdrop.
    pub const CANVAS: Color32 = Color32::from_rgb(10, 10, 10);
    /// Very dark gray application background.
    pub const BACKGROUND: Color32 = Color32::from_rgb(26, 26, 26);
    /// Dark gray panels and chips.
    pub const SURFACE: Color32 = Color32::from_rgb(45, 45, 45);
    /// Dark red primary.
    pub const PRIMARY: Color32 = Color32::from_rgb(139, 0, 0);
    /// Gold accent.
    pub const ACCENT: Color32 = Color32::from_rgb(255, 215, 0);
    /// Orange-red dragon fire.
    pub const FIRE: Color32 = Color32::from_rgb(255, 69, 0);
    /// Beige body text.
    pub const TEXT: Color32 = Color32::from_rgb(245, 245, 220);
    /// Metallic gold secondary text.
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(212, 175, 55);
}

/// Convert a core style color into an egui color.
pub fn color32(color: drakonomi_graph::Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Apply the dark dragon theme to the egui context.
pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = palette::BACKGROUND;
    visuals.window_fill = palette::BACKGROUND;
    visuals.extreme_bg_color = palette::CANVAS;
    visuals.faint_bg_color = palette::SURFACE;
    visuals.override_text_color = Some(palette::TEXT);
    visuals.hyperlink_color = palette::ACCENT;
    visuals.selection.bg_fill = palette::PRIMARY;
    visuals.selection.stroke = egui::Stroke::new(1.0, palette::ACCENT);

    visuals.widgets.noninteractive.bg_fill = palette::BACKGROUND;
    visuals.widgets.inactive.bg_fill = palette::SURFACE;
    visuals.widgets.hovered.bg_fill = palette::SURFACE.gamma_multiply(1.4);
    visuals.widgets.active.bg_fill = palette::PRIMARY;

    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(spacing::ITEM_SPACING, spacing::ITEM_SPACING / 2.0);
        style.spacing.window_margin = egui::Margin::same(spacing::PANEL_PADDING as i8);
    });
}

/// A small rounded tag pill in the tag's own color, as used in the
/// selection bar and detail view. Returns true when clicked.
pub fn tag_pill(ui: &mut egui::Ui, tag: &str, emphasized: bool) -> bool {
    let color = color32(drakonomi_graph::style::tag_color(tag));
    let fill = if emphasized {
        color.gamma_multiply(0.45)
    } else {
        color.gamma_multiply(0.15)
    };
    let text = egui::RichText::new(tag).color(color).small();
    ui.add(egui::Button::new(text).fill(fill).corner_radius(egui::CornerRadius::same(255)))
        .clicked()
}
