//! Temperature summary and carbon footprint.

use super::stats::{max_of, mean, positive_values, round_to};
use crate::models::ParsedSample;

/// Above this many °C the appliance is considered overheating.
pub const OVERHEAT_THRESHOLD_C: f64 = 50.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TemperatureStats {
    // ---
    pub max: f64,
    pub average: f64,
    pub overheat: bool,
}

impl TemperatureStats {
    // ---
    pub fn from_samples(samples: &[ParsedSample]) -> Self {
        // ---
        let temps = positive_values(samples, |s| s.temperature);
        let max = max_of(&temps).map_or(0.0, |t| round_to(t, 2));
        let average = mean(&temps).map_or(0.0, |t| round_to(t, 2));

        Self {
            max,
            average,
            overheat: max > OVERHEAT_THRESHOLD_C,
        }
    }
}

/// CO₂-equivalent mass for `total_energy` kWh, 4 dp.
pub fn carbon_emission(total_energy: f64, emission_factor: f64) -> f64 {
    round_to(total_energy * emission_factor, 4)
}
