pub mod bubble_canvas;
pub mod detail_panel;
pub mod search_bar;
pub mod selection_bar;
pub mod tag_panel;
