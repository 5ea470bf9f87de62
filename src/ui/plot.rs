use std::collections::BTreeMap;

use eframe::egui::{Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, Points};

use crate::color::generate_palette;
use crate::data::model::VehicleDataset;
use crate::data::stats::{box_stats, histogram, BoxStats, MarketSummary};
use crate::state::AppState;

/// Price histogram bin count, matching the original dashboard.
const PRICE_BINS: usize = 50;

/// Cap on raw-data rows rendered per frame.
const MAX_TABLE_ROWS: usize = 1_000;

// ---------------------------------------------------------------------------
// Central panel – the dashboard body
// ---------------------------------------------------------------------------

/// Render the dashboard: metrics row, charts, and the optional raw table.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a listings file to explore the market  (File → Open…)");
            });
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Market Overview");
            metrics_row(ui, &state.summary);
            ui.separator();

            ui.heading("Price Distribution");
            price_histogram(
                ui,
                dataset,
                &state.visible_indices,
                state.filter.vehicle_type.as_deref(),
            );
            ui.separator();

            ui.heading("Price vs Odometer");
            price_odometer_scatter(ui, dataset, &state.visible_indices, state);

            if state.show_advanced {
                ui.separator();
                ui.heading("Advanced Analysis");
                ui.label("Price distribution by model year");
                price_box_by_model_year(ui, dataset, &state.visible_indices);
                ui.add_space(8.0);
                ui.label("Price distribution by condition");
                price_box_by_condition(ui, dataset, &state.visible_indices);
            }

            if state.show_raw_data {
                ui.separator();
                ui.heading("Raw Data");
                raw_data_table(ui, dataset, &state.visible_indices);
            }
        });
}

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

fn metrics_row(ui: &mut Ui, summary: &MarketSummary) {
    ui.columns(4, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Total Listings", thousands(summary.count as f64));
        metric(
            &mut cols[1],
            "Average Price",
            summary
                .mean_price
                .map(|v| format!("${}", thousands(v)))
                .unwrap_or_else(no_data),
        );
        metric(
            &mut cols[2],
            "Avg Odometer",
            summary
                .mean_odometer
                .map(|v| format!("{} miles", thousands(v)))
                .unwrap_or_else(no_data),
        );
        metric(
            &mut cols[3],
            "Avg Days Listed",
            summary
                .mean_days_listed
                .map(|v| format!("{} days", thousands(v)))
                .unwrap_or_else(no_data),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).size(22.0).strong());
    });
}

fn no_data() -> String {
    "no data".to_string()
}

/// Round to whole units and group digits: 14990.4 → "14,990".
fn thousands(v: f64) -> String {
    let n = v.round() as i64;
    let digits = n.abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}

// ---------------------------------------------------------------------------
// Price histogram
// ---------------------------------------------------------------------------

fn price_histogram(ui: &mut Ui, dataset: &VehicleDataset, indices: &[usize], selected_type: Option<&str>) {
    let prices: Vec<f64> = indices.iter().map(|&i| dataset.listings[i].price).collect();
    let Some(hist) = histogram(&prices, PRICE_BINS) else {
        ui.label("No listings match the current filter.");
        return;
    };

    let bars: Vec<Bar> = hist
        .bins
        .iter()
        .map(|bin| Bar::new(bin.center, bin.count as f64).width(hist.bin_width))
        .collect();
    let chart = BarChart::new(bars)
        .name(format!("Prices ({})", selected_type.unwrap_or("all types")))
        .color(Color32::LIGHT_BLUE);

    Plot::new("price_histogram")
        .height(260.0)
        .legend(Legend::default())
        .x_axis_label("Price ($)")
        .y_axis_label("Number of vehicles")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

// ---------------------------------------------------------------------------
// Price vs odometer scatter
// ---------------------------------------------------------------------------

fn price_odometer_scatter(ui: &mut Ui, dataset: &VehicleDataset, indices: &[usize], state: &AppState) {
    // One point series per vehicle type, so the legend doubles as a key.
    let mut by_type: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for &i in indices {
        let listing = &dataset.listings[i];
        if let Some(odometer) = listing.odometer {
            by_type
                .entry(listing.vehicle_type.as_str())
                .or_default()
                .push([odometer, listing.price]);
        }
    }

    if by_type.is_empty() {
        ui.label("No listings with odometer readings match the current filter.");
        return;
    }

    Plot::new("price_odometer")
        .height(300.0)
        .legend(Legend::default())
        .x_axis_label("Odometer (miles)")
        .y_axis_label("Price ($)")
        .show(ui, |plot_ui| {
            for (vehicle_type, points) in by_type {
                let color = state
                    .type_colors
                    .as_ref()
                    .map(|c| c.color_for(vehicle_type))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.points(
                    Points::new(points)
                        .name(vehicle_type)
                        .color(color)
                        .radius(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Box plots
// ---------------------------------------------------------------------------

fn box_elem(x: f64, stats: &BoxStats) -> BoxElem {
    BoxElem::new(
        x,
        BoxSpread::new(
            stats.whisker_low,
            stats.q1,
            stats.median,
            stats.q3,
            stats.whisker_high,
        ),
    )
}

fn price_box_by_model_year(ui: &mut Ui, dataset: &VehicleDataset, indices: &[usize]) {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for &i in indices {
        let listing = &dataset.listings[i];
        if let Some(year) = listing.model_year {
            by_year.entry(year).or_default().push(listing.price);
        }
    }

    let elems: Vec<BoxElem> = by_year
        .iter()
        .filter_map(|(year, prices)| {
            box_stats(prices).map(|s| box_elem(f64::from(*year), &s).box_width(0.6))
        })
        .collect();

    if elems.is_empty() {
        ui.label("No listings with a model year match the current filter.");
        return;
    }

    Plot::new("price_by_model_year")
        .height(260.0)
        .x_axis_label("Model year")
        .y_axis_label("Price ($)")
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(elems));
        });
}

fn price_box_by_condition(ui: &mut Ui, dataset: &VehicleDataset, indices: &[usize]) {
    let mut by_condition: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for &i in indices {
        let listing = &dataset.listings[i];
        by_condition
            .entry(listing.condition.as_str())
            .or_default()
            .push(listing.price);
    }

    if by_condition.is_empty() {
        ui.label("No listings match the current filter.");
        return;
    }

    let palette = generate_palette(by_condition.len());

    Plot::new("price_by_condition")
        .height(260.0)
        .legend(Legend::default())
        .y_axis_label("Price ($)")
        .show_x(false)
        .show(ui, |plot_ui| {
            // One single-element BoxPlot per condition so each gets a legend entry.
            for (slot, ((condition, prices), color)) in
                by_condition.iter().zip(palette.iter()).enumerate()
            {
                if let Some(stats) = box_stats(prices) {
                    let elem = box_elem(slot as f64, &stats)
                        .box_width(0.5)
                        .fill(color.gamma_multiply(0.4))
                        .stroke(Stroke::new(1.5, *color));
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(*condition));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

fn raw_data_table(ui: &mut Ui, dataset: &VehicleDataset, indices: &[usize]) {
    let shown = indices.len().min(MAX_TABLE_ROWS);

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(70.0), 8)
        .header(20.0, |mut header| {
            for title in [
                "price",
                "type",
                "model_year",
                "model",
                "condition",
                "odometer",
                "days_listed",
                "date_posted",
            ] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, shown, |mut row| {
                let listing = &dataset.listings[indices[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(thousands(listing.price));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&listing.vehicle_type);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(
                        listing
                            .model_year
                            .map(|y| y.to_string())
                            .unwrap_or_else(|| "–".to_string()),
                    );
                });
                row.col(|ui: &mut Ui| {
                    ui.label(listing.model.as_deref().unwrap_or("–"));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&listing.condition);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(
                        listing
                            .odometer
                            .map(thousands)
                            .unwrap_or_else(|| "–".to_string()),
                    );
                });
                row.col(|ui: &mut Ui| {
                    ui.label(listing.days_listed.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(listing.date_posted.to_string());
                });
            });
        });

    if indices.len() > MAX_TABLE_ROWS {
        ui.label(format!(
            "Showing the first {MAX_TABLE_ROWS} of {} matching listings.",
            indices.len()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::thousands;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(14_990.4), "14,990");
        assert_eq!(thousands(1_234_567.0), "1,234,567");
        assert_eq!(thousands(-9400.0), "-9,400");
    }
}
