use std::path::PathBuf;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct VehicleMarketApp {
    pub state: AppState,
}

impl VehicleMarketApp {
    /// Start with `dataset_path` loaded if it can be; a failed startup load
    /// leaves the message in the status bar and the app usable via File → Open.
    pub fn new(dataset_path: PathBuf) -> Self {
        let mut state = AppState::default();
        state.open_path(&dataset_path);
        Self { state }
    }
}

impl eframe::App for VehicleMarketApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::central_panel(ui, &self.state);
        });
    }
}
