//! Small numeric helpers shared by the aggregation passes.

use crate::models::ParsedSample;

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    // ---
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Values of one channel that are strictly positive.
///
/// Zero and negative readings are treated as sensor noise or a switched-off
/// device and are left out of averages.
pub fn positive_values(samples: &[ParsedSample], channel: fn(&ParsedSample) -> f64) -> Vec<f64> {
    samples.iter().map(channel).filter(|v| *v > 0.0).collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    // ---
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by N). 0 for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    // ---
    let Some(avg) = mean(values) else {
        return 0.0;
    };
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// `100 - coefficient of variation`, or 100 when there is nothing to measure.
///
/// Not clamped: extreme spreads can push the result below 0.
pub fn stability_index(values: &[f64]) -> f64 {
    // ---
    match mean(values) {
        Some(avg) if avg > 0.0 => round_to(100.0 - population_std_dev(values) / avg * 100.0, 2),
        _ => 100.0,
    }
}

pub fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn min_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}
