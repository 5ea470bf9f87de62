use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Listing – one vehicle-for-sale record
// ---------------------------------------------------------------------------

/// A single vehicle listing (one row of the source file).
///
/// `year_posted` / `month_posted` are derived from `date_posted` once at
/// construction; they are cached denormalizations, never set independently.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Asking price in dollars.
    pub price: f64,
    pub model_year: Option<i32>,
    pub model: Option<String>,
    pub condition: String,
    pub cylinders: Option<i32>,
    pub fuel: Option<String>,
    /// Odometer reading in miles. Missing for a fair chunk of real listings.
    pub odometer: Option<f64>,
    pub transmission: Option<String>,
    /// Vehicle classification ("sedan", "SUV", …) – the primary filter dimension.
    pub vehicle_type: String,
    pub paint_color: Option<String>,
    pub is_4wd: bool,
    /// Calendar date the listing went up.
    pub date_posted: NaiveDate,
    /// How long the listing stayed up, in days.
    pub days_listed: i64,
    pub year_posted: i32,
    pub month_posted: u32,
}

// ---------------------------------------------------------------------------
// VehicleDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indexes.
///
/// Immutable after construction: filtering produces index subsets and never
/// touches the listings themselves.
#[derive(Debug, Clone)]
pub struct VehicleDataset {
    /// All listings (rows), in file order.
    pub listings: Vec<Listing>,
    /// Sorted distinct vehicle types observed in the data.
    pub vehicle_types: Vec<String>,
    /// `(min, max)` price over all listings; `(0.0, 0.0)` when empty.
    pub price_bounds: (f64, f64),
}

impl VehicleDataset {
    /// Build the category index and price bounds from the loaded listings.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let mut types: BTreeSet<String> = BTreeSet::new();
        let mut min_price = f64::INFINITY;
        let mut max_price = f64::NEG_INFINITY;

        for listing in &listings {
            types.insert(listing.vehicle_type.clone());
            min_price = min_price.min(listing.price);
            max_price = max_price.max(listing.price);
        }

        let price_bounds = if listings.is_empty() {
            (0.0, 0.0)
        } else {
            (min_price, max_price)
        };

        VehicleDataset {
            listings,
            vehicle_types: types.into_iter().collect(),
            price_bounds,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl Listing {
    /// Populate the derived post-date components. Call once, at load time.
    pub fn with_derived_date(mut self) -> Self {
        self.year_posted = self.date_posted.year();
        self.month_posted = self.date_posted.month();
        self
    }
}
