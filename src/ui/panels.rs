use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters and Options");
    ui.separator();

    // Clone what we need so we can mutate state inside the widgets.
    let (vehicle_types, price_bounds) = match &state.dataset {
        Some(ds) => (ds.vehicle_types.clone(), ds.price_bounds),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Vehicle type selector ----
            ui.strong("Vehicle type");
            let current = state.filter.vehicle_type.clone();
            egui::ComboBox::from_id_salt("vehicle_type")
                .selected_text(current.as_deref().unwrap_or("All types"))
                .width(180.0)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(current.is_none(), "All types")
                        .clicked()
                    {
                        state.set_vehicle_type(None);
                    }
                    for vehicle_type in &vehicle_types {
                        let is_selected = current.as_deref() == Some(vehicle_type.as_str());
                        if ui.selectable_label(is_selected, vehicle_type).clicked() {
                            state.set_vehicle_type(Some(vehicle_type.clone()));
                        }
                    }
                });
            ui.add_space(8.0);

            // ---- Price range ----
            ui.strong("Price range");
            let (lowest, highest) = price_bounds;
            let mut price_min = state.filter.price_min;
            let mut price_max = state.filter.price_max;
            let mut changed = false;
            changed |= ui
                .add(Slider::new(&mut price_min, lowest..=highest).text("min $"))
                .changed();
            changed |= ui
                .add(Slider::new(&mut price_max, lowest..=highest).text("max $"))
                .changed();
            if changed {
                // Inverted ranges simply match nothing; no clamping here.
                state.set_price_range(price_min, price_max);
            }

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
            ui.separator();

            // ---- View toggles ----
            ui.checkbox(&mut state.show_advanced, "Show advanced analysis");
            ui.checkbox(&mut state.show_raw_data, "Show raw data");
            ui.separator();

            // ---- About ----
            ui.heading("About");
            ui.label(
                "This dashboard analyzes vehicle listings data to provide insights \
                 into market trends, pricing, and vehicle characteristics.",
            );
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} listings loaded, {} shown",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open vehicle listings")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
