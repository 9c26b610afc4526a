use crate::theme;
use drakonomi_catalog::MIN_SEARCH_LEN;
use eframe::egui;

/// Live search field. Filtering kicks in at [`MIN_SEARCH_LEN`]
/// characters; anything shorter means "no filter".
pub struct SearchBar {
    query: String,
}

impl SearchBar {
    pub fn new() -> Self {
        Self {
            query: String::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The active filter term, if long enough to filter with.
    pub fn effective_term(&self) -> Option<&str> {
        let trimmed = self.query.trim();
        (trimmed.chars().count() >= MIN_SEARCH_LEN).then_some(trimmed)
    }

    /// Render the field; returns true when the query changed this frame.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .hint_text("Search dragons (name, tags, origin...)")
                    .desired_width(300.0),
            );
            changed |= response.changed();

            if response.has_focus() && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.query.clear();
                changed = true;
            }

            if !self.query.is_empty() {
                let clear = egui::RichText::new("✕").color(theme::palette::TEXT_SECONDARY);
                if ui.small_button(clear).clicked() {
                    self.query.clear();
                    changed = true;
                }
            }
        });

        changed
    }
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_term_requires_two_characters() {
        let mut bar = SearchBar::new();
        assert_eq!(bar.effective_term(), None);

        bar.query = "f".to_string();
        assert_eq!(bar.effective_term(), None);

        bar.query = "  f ".to_string();
        assert_eq!(bar.effective_term(), None);

        bar.query = " fa ".to_string();
        assert_eq!(bar.effective_term(), Some("fa"));
    }
}
