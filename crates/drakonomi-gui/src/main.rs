#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;

mod app;
mod components;
mod fetcher;
mod settings;
mod theme;

use app::DrakonomiApp;

fn main() -> eframe::Result<()> {
    // Log to stdout; tune with `RUST_LOG=debug`.
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title("Drakonomi"),
        ..Default::default()
    };

    eframe::run_native(
        "Drakonomi",
        options,
        Box::new(|cc| {
            // This gives us image support:
            egui_extras::install_image_loaders(&cc.egui_ctx);
            match DrakonomiApp::new(cc) {
                Ok(app) => Ok(Box::new(app)),
                Err(err) => Err(err.into()),
            }
        }),
    )
}
