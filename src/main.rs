mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::VehicleMarketApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // First argument overrides the conventional dataset location.
    let dataset_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("vehicles_us.csv"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vehicle Market Analysis Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(VehicleMarketApp::new(dataset_path)))),
    )
}
