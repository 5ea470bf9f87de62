use super::model::VehicleDataset;

// ---------------------------------------------------------------------------
// Filter parameters: vehicle type selection and closed price interval
// ---------------------------------------------------------------------------

/// The two user-facing predicates.
///
/// `vehicle_type: None` means "no restriction" (the dashboard's "All types");
/// `Some(t)` keeps only listings whose type matches `t` exactly. The price
/// interval is closed on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    pub vehicle_type: Option<String>,
    pub price_min: f64,
    pub price_max: f64,
}

/// Initialise a [`ListingFilter`] that passes every listing: no type
/// restriction, price bounds set to the dataset's own min/max.
pub fn init_filter(dataset: &VehicleDataset) -> ListingFilter {
    let (price_min, price_max) = dataset.price_bounds;
    ListingFilter {
        vehicle_type: None,
        price_min,
        price_max,
    }
}

/// Return indices of listings that pass both predicates, in dataset order.
///
/// A listing passes when:
/// * no type is selected, or its type matches the selected one exactly
/// * `price_min <= price <= price_max`
///
/// An inverted range (`price_min > price_max`) matches nothing; it is not an
/// error. The dataset is never mutated.
pub fn filtered_indices(dataset: &VehicleDataset, filter: &ListingFilter) -> Vec<usize> {
    dataset
        .listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| {
            if let Some(wanted) = &filter.vehicle_type {
                if listing.vehicle_type != *wanted {
                    return false;
                }
            }
            listing.price >= filter.price_min && listing.price <= filter.price_max
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::model::tests::listing;
    use super::super::model::VehicleDataset;
    use super::*;

    fn sample() -> VehicleDataset {
        VehicleDataset::from_listings(vec![
            listing("suv", 10_000.0),
            listing("sedan", 20_000.0),
            listing("suv", 30_000.0),
        ])
    }

    #[test]
    fn init_filter_passes_everything() {
        let ds = sample();
        let filter = init_filter(&ds);
        assert_eq!(filter.vehicle_type, None);
        assert_eq!(filtered_indices(&ds, &filter), vec![0, 1, 2]);
    }

    #[test]
    fn type_and_price_predicates_compose() {
        let ds = sample();
        let filter = ListingFilter {
            vehicle_type: Some("suv".to_string()),
            price_min: 0.0,
            price_max: 100_000.0,
        };
        assert_eq!(filtered_indices(&ds, &filter), vec![0, 2]);
    }

    #[test]
    fn price_interval_is_closed() {
        let ds = sample();
        let filter = ListingFilter {
            vehicle_type: None,
            price_min: 10_000.0,
            price_max: 20_000.0,
        };
        // Both boundary prices are included.
        assert_eq!(filtered_indices(&ds, &filter), vec![0, 1]);
    }

    #[test]
    fn out_of_range_bounds_match_nothing() {
        let ds = sample();
        let filter = ListingFilter {
            vehicle_type: None,
            price_min: 50_000.0,
            price_max: 60_000.0,
        };
        assert!(filtered_indices(&ds, &filter).is_empty());
    }

    #[test]
    fn inverted_range_is_empty_not_an_error() {
        let ds = sample();
        let filter = ListingFilter {
            vehicle_type: None,
            price_min: 30_000.0,
            price_max: 10_000.0,
        };
        assert!(filtered_indices(&ds, &filter).is_empty());
    }

    #[test]
    fn subset_matches_brute_force_scan() {
        let prices = [4_900.0, 9_400.0, 14_990.0, 25_500.0, 33_000.0, 9_000.0];
        let types = ["sedan", "SUV", "pickup", "SUV", "truck", "sedan"];
        let ds = VehicleDataset::from_listings(
            types
                .iter()
                .zip(prices.iter())
                .map(|(t, &p)| listing(t, p))
                .collect(),
        );

        let filter = ListingFilter {
            vehicle_type: Some("SUV".to_string()),
            price_min: 9_000.0,
            price_max: 26_000.0,
        };
        let got = filtered_indices(&ds, &filter);

        let expected: Vec<usize> = ds
            .listings
            .iter()
            .enumerate()
            .filter(|(_, l)| {
                l.vehicle_type == "SUV" && l.price >= 9_000.0 && l.price <= 26_000.0
            })
            .map(|(i, _)| i)
            .collect();

        assert_eq!(got, expected);
        assert_eq!(got.len(), 2);
        // Every returned listing satisfies both predicates.
        for &i in &got {
            let l = &ds.listings[i];
            assert_eq!(l.vehicle_type, "SUV");
            assert!(l.price >= 9_000.0 && l.price <= 26_000.0);
        }
    }
}
