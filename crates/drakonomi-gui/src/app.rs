use crate::components::bubble_canvas::BubbleCanvas;
use crate::components::detail_panel::{self, DetailAction};
use crate::components::search_bar::SearchBar;
use crate::components::selection_bar::{self, SelectionBarAction};
use crate::components::tag_panel::{self, TagPanelAction};
use crate::fetcher::HttpFetcher;
use crate::settings::{self, AppSettings};
use crate::theme;

use anyhow::Context as _;
use drakonomi_catalog::Catalog;
use drakonomi_core::{Dragon, DragonId};
use drakonomi_graph::{
    build_graph, ForceLayout, GraphSnapshot, HighlightState, ImageCache, LayoutConfig,
    SelectionState,
};
use drakonomi_storage::FavoritesStore;
use eframe::egui;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

pub struct DrakonomiApp {
    catalog: Catalog,
    favorites: FavoritesStore,
    favorite_ids: HashSet<DragonId>,
    settings: AppSettings,

    search: SearchBar,
    selection: SelectionState,
    highlight: HighlightState,

    snapshot: GraphSnapshot,
    layout: ForceLayout,
    images: ImageCache,
    textures: HashMap<DragonId, egui::TextureHandle>,
    canvas: BubbleCanvas,

    detail: Option<DragonId>,
    current_ids: Vec<DragonId>,
}

impl DrakonomiApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        theme::apply(&cc.egui_ctx);

        let settings = AppSettings::load();
        let catalog = Catalog::from_seed().context("failed to load the seed catalog")?;

        let favorites = match settings::favorites_path() {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                match FavoritesStore::open(&path) {
                    Ok(store) => store,
                    Err(err) => {
                        tracing::warn!(?path, %err, "favorites store unavailable, using in-memory fallback");
                        FavoritesStore::new_in_memory()
                            .context("failed to open in-memory favorites store")?
                    }
                }
            }
            None => FavoritesStore::new_in_memory()
                .context("failed to open in-memory favorites store")?,
        };
        let favorite_ids = favorites.all().context("failed to read favorites")?;

        let mut app = Self {
            catalog,
            favorites,
            favorite_ids,
            settings,
            search: SearchBar::new(),
            selection: SelectionState::default(),
            highlight: HighlightState::default(),
            snapshot: GraphSnapshot::default(),
            layout: ForceLayout::new(LayoutConfig::default()),
            images: ImageCache::new(Arc::new(HttpFetcher::new())),
            textures: HashMap::new(),
            canvas: BubbleCanvas::new(),
            detail: None,
            current_ids: Vec::new(),
        };
        app.refresh_entities();
        Ok(app)
    }

    /// Recompute the active entity list from the search term and, only if
    /// the id set actually changed, rebuild the graph and reheat the
    /// layout. Selection keeps everything still present; highlight state
    /// is untouched.
    fn refresh_entities(&mut self) {
        let entities: Vec<Dragon> = match self.search.effective_term() {
            Some(term) => self.catalog.search(term).into_iter().cloned().collect(),
            None => self.catalog.list_all().to_vec(),
        };

        let ids: Vec<DragonId> = entities.iter().map(|d| d.id).collect();
        if ids == self.current_ids {
            return;
        }

        self.snapshot = build_graph(&entities);
        self.layout.set_graph(&self.snapshot);
        self.images.acquire(&entities);

        let present: HashSet<DragonId> = ids.iter().copied().collect();
        self.selection.retain_present(&present);
        self.current_ids = ids;
    }

    /// Upload any freshly decoded artwork as textures, once per node.
    fn upload_ready_textures(&mut self, ctx: &egui::Context) {
        for node in &self.snapshot.nodes {
            if self.textures.contains_key(&node.id) {
                continue;
            }
            let Some(img) = self.images.get(node.id) else {
                continue;
            };
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [img.width as usize, img.height as usize],
                &img.rgba,
            );
            let texture = ctx.load_texture(
                format!("dragon-{}", node.id),
                color_image,
                egui::TextureOptions::LINEAR,
            );
            self.textures.insert(node.id, texture);
        }
    }

    /// Distinct tags in the active entity list with their node counts,
    /// alphabetical.
    fn distinct_tags(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for node in &self.snapshot.nodes {
            for tag in &node.tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
        let mut tags: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        tags.sort();
        tags
    }

    fn toggle_favorite(&mut self, id: DragonId) {
        match self.favorites.toggle(id) {
            Ok(true) => {
                self.favorite_ids.insert(id);
            }
            Ok(false) => {
                self.favorite_ids.remove(&id);
            }
            Err(err) => tracing::warn!(%id, %err, "failed to toggle favorite"),
        }
    }

    fn header_ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut search_changed = false;

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("🐉").size(24.0));
            ui.vertical(|ui| {
                ui.label(
                    egui::RichText::new("Drakonomi")
                        .color(theme::palette::ACCENT)
                        .strong()
                        .size(18.0),
                );
                ui.label(
                    egui::RichText::new("Dragon Wisdom Platform")
                        .color(theme::palette::TEXT_SECONDARY)
                        .small(),
                );
            });

            ui.separator();
            search_changed = self.search.ui(ui);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.menu_button("⚙", |ui| {
                    let mut changed = false;
                    changed |= ui
                        .checkbox(&mut self.settings.show_tag_panel, "Tag highlight panel")
                        .changed();
                    changed |= ui
                        .checkbox(&mut self.settings.show_edge_particles, "Edge flow particles")
                        .changed();
                    if ui.button("Reset view").clicked() {
                        self.canvas.reset_view();
                        ui.close();
                    }
                    if changed {
                        self.settings.save();
                    }
                });

                let count = self.snapshot.nodes.len();
                let plural = if count == 1 { "" } else { "s" };
                ui.label(
                    egui::RichText::new(format!("{count} dragon{plural}"))
                        .color(theme::palette::TEXT_SECONDARY),
                );
            });
        });

        search_changed
    }
}

impl eframe::App for DrakonomiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let newly_loaded = self.images.poll();
        self.layout.step_frame();
        self.upload_ready_textures(ctx);

        let mut search_changed = false;
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            search_changed = self.header_ui(ui);
        });
        if search_changed {
            self.refresh_entities();
        }

        if !self.selection.is_empty() {
            let mut action = None;
            egui::TopBottomPanel::top("selection_bar").show(ctx, |ui| {
                action = selection_bar::show(
                    ui,
                    &self.catalog,
                    &self.selection,
                    &self.favorite_ids,
                    &self.textures,
                );
            });
            match action {
                Some(SelectionBarAction::Open(id)) => self.detail = Some(id),
                Some(SelectionBarAction::Remove(id)) => self.selection.remove(id),
                Some(SelectionBarAction::ToggleFavorite(id)) => self.toggle_favorite(id),
                Some(SelectionBarAction::HighlightTag(tag)) => self.highlight.toggle_tag(&tag),
                None => {}
            }
        }

        if self.settings.show_tag_panel {
            let tags = self.distinct_tags();
            let mut action = None;
            egui::SidePanel::left("tag_panel")
                .default_width(170.0)
                .show(ctx, |ui| {
                    action = tag_panel::show(ui, &tags, &self.highlight);
                });
            match action {
                Some(TagPanelAction::Toggle(tag)) => self.highlight.toggle_tag(&tag),
                Some(TagPanelAction::Clear) => self.highlight.clear(),
                None => {}
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                let time = ui.input(|i| i.time);
                let output = self.canvas.show(
                    ui,
                    rect,
                    &self.snapshot,
                    &mut self.layout,
                    &self.selection,
                    &self.highlight,
                    &self.textures,
                    self.settings.show_edge_particles,
                    time,
                );
                if let Some(id) = output.clicked {
                    self.selection.toggle(id);
                }
                if let Some(id) = output.opened {
                    self.detail = Some(id);
                }

                if self.snapshot.is_empty() {
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "No dragons found — try a different search term",
                        egui::FontId::proportional(18.0),
                        theme::palette::TEXT_SECONDARY,
                    );
                }
            });

        if let Some(id) = self.detail {
            match detail_panel::show(
                ctx,
                &self.catalog,
                id,
                &self.favorite_ids,
                &self.textures,
                self.settings.related_limit,
            ) {
                Some(DetailAction::Close) => self.detail = None,
                Some(DetailAction::Open(other)) => self.detail = Some(other),
                Some(DetailAction::ToggleFavorite(id)) => self.toggle_favorite(id),
                None => {}
            }
        }

        // Repaint policy: continuous while the simulation is warm or
        // loads are landing, a relaxed cadence for particle animation,
        // and on demand otherwise.
        if self.layout.is_settling() || newly_loaded > 0 || !self.images.is_settled() {
            ctx.request_repaint();
        } else if self.settings.show_edge_particles && !self.snapshot.edges.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(33));
        }
    }
}
