//! Threshold alerts, recomputed from scratch on every call.

use super::bundle::Alert;
use super::environment::OVERHEAT_THRESHOLD_C;
use crate::models::ParsedSample;

pub const HIGH_POWER_W: f64 = 100.0;
pub const MIN_VOLTAGE_STABILITY: f64 = 90.0;
pub const MAX_POWER_FLUCTUATION: f64 = 30.0;

/// Evaluate the alert rules in their fixed reporting order.
pub fn evaluate(latest: &ParsedSample, voltage_stability: f64, power_fluctuation: f64) -> Vec<Alert> {
    // ---
    [
        (latest.power > HIGH_POWER_W)
            .then(|| Alert::warning(format!("High power consumption: {}W", latest.power))),
        (latest.temperature > OVERHEAT_THRESHOLD_C)
            .then(|| Alert::danger(format!("Overheating detected: {}°C", latest.temperature))),
        (voltage_stability < MIN_VOLTAGE_STABILITY).then(|| {
            Alert::warning(format!("Voltage fluctuation high: {voltage_stability}% stability"))
        }),
        (power_fluctuation > MAX_POWER_FLUCTUATION)
            .then(|| Alert::warning(format!("Power fluctuation detected: {power_fluctuation}%"))),
    ]
    .into_iter()
    .flatten()
    .collect()
}
