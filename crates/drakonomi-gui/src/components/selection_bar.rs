use crate::theme;
use drakonomi_catalog::Catalog;
use drakonomi_core::DragonId;
use drakonomi_graph::{style, SelectionState};
use eframe::egui;
use std::collections::{HashMap, HashSet};

/// What the user did in the selection bar this frame.
pub enum SelectionBarAction {
    Open(DragonId),
    Remove(DragonId),
    ToggleFavorite(DragonId),
    HighlightTag(String),
}

/// Chips for the up-to-three selected dragons: artwork ring in the node
/// color, name link, tag pills, favorite star, remove button.
pub fn show(
    ui: &mut egui::Ui,
    catalog: &Catalog,
    selection: &SelectionState,
    favorites: &HashSet<DragonId>,
    textures: &HashMap<DragonId, egui::TextureHandle>,
) -> Option<SelectionBarAction> {
    let mut action = None;

    for &id in selection.ids() {
        let Some(dragon) = catalog.get_by_id(id) else {
            continue;
        };
        let node_color = theme::color32(style::primary_color(&dragon.tags));

        ui.horizontal(|ui| {
            match textures.get(&id) {
                Some(texture) => {
                    ui.image((texture.id(), egui::vec2(28.0, 28.0)));
                }
                None => {
                    ui.label(egui::RichText::new("●").color(node_color).size(20.0));
                }
            }

            let name = egui::RichText::new(format!("{} →", dragon.name))
                .color(node_color)
                .strong();
            if ui
                .add(egui::Label::new(name).sense(egui::Sense::click()))
                .on_hover_text("Open details")
                .clicked()
            {
                action = Some(SelectionBarAction::Open(id));
            }

            for tag in &dragon.tags {
                if theme::tag_pill(ui, tag, false) {
                    action = Some(SelectionBarAction::HighlightTag(tag.clone()));
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .small_button(egui::RichText::new("✕").color(theme::palette::TEXT_SECONDARY))
                    .on_hover_text("Remove from selection")
                    .clicked()
                {
                    action = Some(SelectionBarAction::Remove(id));
                }

                let star = if favorites.contains(&id) { "★" } else { "☆" };
                if ui
                    .small_button(egui::RichText::new(star).color(theme::palette::ACCENT))
                    .on_hover_text("Toggle favorite")
                    .clicked()
                {
                    action = Some(SelectionBarAction::ToggleFavorite(id));
                }
            });
        });
    }

    action
}
