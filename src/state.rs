use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::CategoryColors;
use crate::data::cache::DatasetCache;
use crate::data::filter::{filtered_indices, init_filter, ListingFilter};
use crate::data::model::VehicleDataset;
use crate::data::stats::{summarize, MarketSummary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Memoized loads, keyed by source path. Owned here, per the data layer's
    /// contract that the caller holds the cache.
    pub cache: DatasetCache,

    /// Loaded dataset (None until a file loads). Shared with the cache.
    pub dataset: Option<Arc<VehicleDataset>>,

    /// Where the current dataset came from.
    pub source: Option<PathBuf>,

    /// Current filter parameters.
    pub filter: ListingFilter,

    /// Indices of listings passing the current filter (cached).
    pub visible_indices: Vec<usize>,

    /// Headline metrics over the visible listings (cached).
    pub summary: MarketSummary,

    /// Scatter-plot colours, one per vehicle type.
    pub type_colors: Option<CategoryColors>,

    /// "Show Advanced Analysis" toggle (box plots).
    pub show_advanced: bool,

    /// "Show Raw Data" toggle (listing table).
    pub show_raw_data: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            cache: DatasetCache::new(),
            dataset: None,
            source: None,
            filter: ListingFilter {
                vehicle_type: None,
                price_min: 0.0,
                price_max: 0.0,
            },
            visible_indices: Vec::new(),
            summary: MarketSummary::empty(),
            type_colors: None,
            show_advanced: false,
            show_raw_data: false,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Load `path` through the cache and make it the active dataset.
    /// Failures land in the status bar; the previous dataset stays active.
    pub fn open_path(&mut self, path: &Path) {
        self.loading = true;
        match self.cache.get_or_load(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} listings ({} vehicle types) from {}",
                    dataset.len(),
                    dataset.vehicle_types.len(),
                    path.display()
                );
                self.set_dataset(dataset, path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                self.loading = false;
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise filter, metrics, colours.
    pub fn set_dataset(&mut self, dataset: Arc<VehicleDataset>, source: PathBuf) {
        self.filter = init_filter(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.summary = summarize(&dataset, &self.visible_indices);
        self.type_colors = Some(CategoryColors::new(&dataset.vehicle_types));

        self.dataset = Some(dataset);
        self.source = Some(source);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute `visible_indices` and the summary after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filter);
            self.summary = summarize(ds, &self.visible_indices);
        }
    }

    /// Select a vehicle type (`None` = all types).
    pub fn set_vehicle_type(&mut self, vehicle_type: Option<String>) {
        self.filter.vehicle_type = vehicle_type;
        self.refilter();
    }

    /// Move the price interval; the engine tolerates an inverted range by
    /// matching nothing, so no clamping is needed here.
    pub fn set_price_range(&mut self, price_min: f64, price_max: f64) {
        self.filter.price_min = price_min;
        self.filter.price_max = price_max;
        self.refilter();
    }

    /// Back to "All types" and the dataset's own price bounds.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filter = init_filter(ds);
        }
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;

    fn state_with_sample() -> AppState {
        let mut state = AppState::default();
        let dataset = Arc::new(VehicleDataset::from_listings(vec![
            listing("suv", 10_000.0),
            listing("sedan", 20_000.0),
            listing("suv", 30_000.0),
        ]));
        state.set_dataset(dataset, PathBuf::from("sample.csv"));
        state
    }

    #[test]
    fn fresh_dataset_shows_everything() {
        let state = state_with_sample();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.summary.count, 3);
        assert_eq!(state.summary.mean_price, Some(20_000.0));
        assert_eq!(state.filter.price_min, 10_000.0);
        assert_eq!(state.filter.price_max, 30_000.0);
    }

    #[test]
    fn type_selection_narrows_summary() {
        let mut state = state_with_sample();
        state.set_vehicle_type(Some("suv".to_string()));
        assert_eq!(state.visible_indices, vec![0, 2]);
        assert_eq!(state.summary.count, 2);
        assert_eq!(state.summary.mean_price, Some(20_000.0));
    }

    #[test]
    fn reset_restores_full_view() {
        let mut state = state_with_sample();
        state.set_vehicle_type(Some("sedan".to_string()));
        state.set_price_range(0.0, 1.0);
        assert_eq!(state.summary.count, 0);
        assert_eq!(state.summary.mean_price, None);

        state.reset_filters();
        assert_eq!(state.summary.count, 3);
    }
}
