use crate::theme;
use drakonomi_catalog::Catalog;
use drakonomi_core::DragonId;
use drakonomi_graph::style;
use eframe::egui;
use std::collections::{HashMap, HashSet};

pub enum DetailAction {
    Close,
    Open(DragonId),
    ToggleFavorite(DragonId),
}

/// Detail window for one dragon: artwork, lore, common names, tags, and
/// a related-dragons strip (shared-tag neighbors from the catalog).
pub fn show(
    ctx: &egui::Context,
    catalog: &Catalog,
    id: DragonId,
    favorites: &HashSet<DragonId>,
    textures: &HashMap<DragonId, egui::TextureHandle>,
    related_limit: usize,
) -> Option<DetailAction> {
    let Some(dragon) = catalog.get_by_id(id) else {
        // The record vanished (should not happen with a static catalog);
        // close rather than render a ghost.
        return Some(DetailAction::Close);
    };

    let mut action = None;
    let mut open = true;

    egui::Window::new(
        egui::RichText::new(&dragon.name)
            .color(theme::palette::ACCENT)
            .strong(),
    )
    .id(egui::Id::new("dragon_detail"))
    .open(&mut open)
    .default_width(380.0)
    .collapsible(false)
    .show(ctx, |ui| {
        ui.label(
            egui::RichText::new(&dragon.origin)
                .color(theme::palette::TEXT_SECONDARY)
                .italics(),
        );

        if let Some(texture) = textures.get(&id) {
            ui.add_space(theme::spacing::ITEM_SPACING);
            ui.vertical_centered(|ui| {
                ui.image((texture.id(), egui::vec2(180.0, 180.0)));
            });
        }

        ui.add_space(theme::spacing::ITEM_SPACING);
        ui.label(&dragon.description);

        if !dragon.common_names.is_empty() {
            ui.add_space(theme::spacing::ITEM_SPACING);
            ui.label(
                egui::RichText::new("Common names")
                    .color(theme::palette::TEXT_SECONDARY)
                    .strong(),
            );
            ui.horizontal_wrapped(|ui| {
                for name in &dragon.common_names {
                    ui.label(
                        egui::RichText::new(name)
                            .color(theme::palette::TEXT)
                            .small(),
                    );
                }
            });
        }

        ui.add_space(theme::spacing::ITEM_SPACING);
        ui.label(
            egui::RichText::new("Attributes")
                .color(theme::palette::TEXT_SECONDARY)
                .strong(),
        );
        ui.horizontal_wrapped(|ui| {
            for tag in &dragon.tags {
                theme::tag_pill(ui, tag, false);
            }
        });

        ui.add_space(theme::spacing::ITEM_SPACING);
        let star = if favorites.contains(&id) {
            "★ Remove from favorites"
        } else {
            "☆ Add to favorites"
        };
        if ui
            .button(egui::RichText::new(star).color(theme::palette::ACCENT))
            .clicked()
        {
            action = Some(DetailAction::ToggleFavorite(id));
        }

        let related = catalog.get_related(id, related_limit);
        if !related.is_empty() {
            ui.add_space(theme::spacing::ITEM_SPACING);
            ui.separator();
            ui.label(
                egui::RichText::new("Related dragons")
                    .color(theme::palette::TEXT_SECONDARY)
                    .strong(),
            );
            ui.horizontal_wrapped(|ui| {
                for other in related {
                    let color = theme::color32(style::primary_color(&other.tags));
                    let label = egui::RichText::new(&other.name).color(color);
                    if ui
                        .add(egui::Label::new(label).sense(egui::Sense::click()))
                        .clicked()
                    {
                        action = Some(DetailAction::Open(other.id));
                    }
                }
            });
        }
    });

    if !open {
        return Some(DetailAction::Close);
    }
    action
}
