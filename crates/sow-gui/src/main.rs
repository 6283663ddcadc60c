//! GUI entry point for the Sow Brand tools

mod app;
mod load_dialog;
mod quote_panel;
mod techpack_panel;
mod widgets;
mod worker;

use app::SowApp;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sow Brand Systems",
        options,
        Box::new(|cc| Ok(Box::new(SowApp::new(cc)))),
    )
}
