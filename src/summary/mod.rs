use crate::model::Offer;

/// Derived figures over the current result set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub total: usize,
    pub total_volume: i64,
    pub avg_rate: f64,
}

/// Recompute the summary figures. Missing volume and rate count as zero;
/// the average divides by the full record count, so an empty set yields
/// zero, not an error.
pub fn totals(offers: &[Offer]) -> Totals {
    let total = offers.len();
    let total_volume: i64 = offers.iter().map(|o| o.volume.unwrap_or(0)).sum();
    let rate_sum: f64 = offers.iter().map(|o| o.rate.unwrap_or(0.0)).sum();
    let avg_rate = if total == 0 {
        0.0
    } else {
        rate_sum / total as f64
    };
    Totals {
        total,
        total_volume,
        avg_rate,
    }
}
