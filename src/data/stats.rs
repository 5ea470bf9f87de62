use super::model::VehicleDataset;

// ---------------------------------------------------------------------------
// Market summary – the four headline metrics
// ---------------------------------------------------------------------------

/// Scalar summaries over a filtered subset.
///
/// Means are `None` when there is nothing to average: an empty subset, or a
/// nullable field (odometer) with no values present. "No data" is an explicit
/// state here, never a NaN or a fabricated zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSummary {
    pub count: usize,
    pub mean_price: Option<f64>,
    pub mean_odometer: Option<f64>,
    pub mean_days_listed: Option<f64>,
}

impl MarketSummary {
    pub fn empty() -> Self {
        MarketSummary {
            count: 0,
            mean_price: None,
            mean_odometer: None,
            mean_days_listed: None,
        }
    }
}

/// Compute the four metrics over the listings selected by `indices`.
///
/// `indices` is whatever [`super::filter::filtered_indices`] produced; the
/// dataset itself is read-only. Listings missing an optional numeric field
/// are skipped for that field's mean only.
pub fn summarize(dataset: &VehicleDataset, indices: &[usize]) -> MarketSummary {
    MarketSummary {
        count: indices.len(),
        mean_price: mean(indices.iter().map(|&i| dataset.listings[i].price)),
        mean_odometer: mean(indices.iter().filter_map(|&i| dataset.listings[i].odometer)),
        mean_days_listed: mean(indices.iter().map(|&i| dataset.listings[i].days_listed as f64)),
    }
}

/// Arithmetic mean; `None` for an empty iterator.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (mut sum, mut n) = (0.0, 0usize);
    for v in values {
        sum += v;
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Histogram – equal-width bins for the price distribution chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub center: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
}

/// Bin `values` into `n_bins` equal-width bins spanning their min..max.
///
/// Returns `None` for empty input. All-equal input collapses to a single
/// bin of nominal width 1 so the chart still has something to draw.
pub fn histogram(values: &[f64], n_bins: usize) -> Option<Histogram> {
    if values.is_empty() || n_bins == 0 {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return Some(Histogram {
            bin_width: 1.0,
            bins: vec![HistogramBin {
                center: min,
                count: values.len(),
            }],
        });
    }

    let bin_width = (max - min) / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        // The max value lands in the last bin, not one past it.
        let idx = (((v - min) / bin_width) as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            center: min + (i as f64 + 0.5) * bin_width,
            count,
        })
        .collect();

    Some(Histogram { bin_width, bins })
}

// ---------------------------------------------------------------------------
// Box statistics – quartiles and whiskers for the box plots
// ---------------------------------------------------------------------------

/// Five-number summary with whiskers at the furthest data points inside the
/// 1.5×IQR fences (the usual box-plot convention).
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = percentile(&sorted, 0.25);
    let median = percentile(&sorted, 0.5);
    let q3 = percentile(&sorted, 0.75);

    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let whisker_low = sorted
        .iter()
        .copied()
        .find(|&v| v >= low_fence)
        .unwrap_or(q1);
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= high_fence)
        .unwrap_or(q3);

    Some(BoxStats {
        whisker_low,
        q1,
        median,
        q3,
        whisker_high,
    })
}

/// Linearly interpolated percentile over pre-sorted values.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let h = last as f64 * p;
    let lo = h.floor() as usize;
    let hi = (h.ceil() as usize).min(last);
    sorted[lo] + (sorted[hi] - sorted[lo]) * (h - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::super::filter::{filtered_indices, ListingFilter};
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
    fn suv_subset_summary() {
        let ds = sample();
        let filter = ListingFilter {
            vehicle_type: Some("suv".to_string()),
            price_min: 0.0,
            price_max: 100_000.0,
        };
        let indices = filtered_indices(&ds, &filter);
        let summary = summarize(&ds, &indices);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean_price, Some(20_000.0));
        assert_eq!(summary.mean_days_listed, Some(19.0));
    }

    #[test]
    fn empty_subset_has_no_data_not_zeros() {
        let ds = sample();
        let filter = ListingFilter {
            vehicle_type: None,
            price_min: 50_000.0,
            price_max: 60_000.0,
        };
        let indices = filtered_indices(&ds, &filter);
        assert!(indices.is_empty());

        let summary = summarize(&ds, &indices);
        assert_eq!(summary, MarketSummary::empty());
    }

    #[test]
    fn odometer_mean_skips_missing_values() {
        let mut with_gap = listing("suv", 10_000.0);
        with_gap.odometer = None;
        let mut known = listing("suv", 20_000.0);
        known.odometer = Some(50_000.0);

        let ds = VehicleDataset::from_listings(vec![with_gap, known]);
        let summary = summarize(&ds, &[0, 1]);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean_odometer, Some(50_000.0));
    }

    #[test]
    fn all_odometers_missing_is_no_data() {
        let mut a = listing("suv", 10_000.0);
        a.odometer = None;
        let mut b = listing("suv", 20_000.0);
        b.odometer = None;

        let ds = VehicleDataset::from_listings(vec![a, b]);
        let summary = summarize(&ds, &[0, 1]);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean_odometer, None);
        assert_eq!(summary.mean_price, Some(15_000.0));
    }

    #[test]
    fn histogram_counts_every_value_once() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 5.0];
        let hist = histogram(&values, 4).unwrap();

        assert_eq!(hist.bins.len(), 4);
        let total: usize = hist.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, values.len());
        // Max values land in the last bin rather than falling off the end.
        assert_eq!(hist.bins.last().unwrap().count, 3);
    }

    #[test]
    fn histogram_of_identical_values_is_one_bin() {
        let hist = histogram(&[7.0, 7.0, 7.0], 50).unwrap();
        assert_eq!(hist.bins.len(), 1);
        assert_eq!(hist.bins[0].count, 3);
        assert_eq!(hist.bins[0].center, 7.0);
    }

    #[test]
    fn histogram_of_nothing_is_none() {
        assert_eq!(histogram(&[], 50), None);
    }

    #[test]
    fn box_stats_five_number_summary() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = box_stats(&values).unwrap();

        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 5.0);
    }

    #[test]
    fn box_stats_whiskers_stop_at_fences() {
        // 100 is far outside the 1.5×IQR fence and must not drag the whisker.
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = box_stats(&values).unwrap();
        assert!(stats.whisker_high < 100.0);
    }

    #[test]
    fn box_stats_of_nothing_is_none() {
        assert_eq!(box_stats(&[]), None);
    }
}
