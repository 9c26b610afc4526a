use crate::theme;
use drakonomi_graph::HighlightState;
use eframe::egui;

pub enum TagPanelAction {
    Toggle(String),
    Clear,
}

/// Highlight chips for every distinct tag in the active entity list.
/// Clicking a chip toggles the tag's highlight; highlighted nodes get
/// the glow treatment on the canvas.
pub fn show(
    ui: &mut egui::Ui,
    tags: &[(String, usize)],
    highlight: &HighlightState,
) -> Option<TagPanelAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("Highlight tags")
                .color(theme::palette::TEXT_SECONDARY)
                .strong(),
        );
        if highlight.is_active() && ui.small_button("Clear").clicked() {
            action = Some(TagPanelAction::Clear);
        }
    });
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (tag, count) in tags {
            ui.horizontal(|ui| {
                if theme::tag_pill(ui, tag, highlight.contains(tag)) {
                    action = Some(TagPanelAction::Toggle(tag.clone()));
                }
                ui.label(
                    egui::RichText::new(format!("{count}"))
                        .color(theme::palette::TEXT_SECONDARY)
                        .small(),
                );
            });
        }
    });

    action
}
