//! Load factor and supply stability.

use super::power::PowerStats;
use super::stats::{positive_values, stability_index};
use crate::models::ParsedSample;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityStats {
    // ---
    pub load_factor: f64,
    /// 100 minus the coefficient of variation of positive voltages.
    pub voltage_stability: f64,
    /// Same measure over positive currents.
    pub current_stability: f64,
}

impl Default for StabilityStats {
    // ---
    /// No data is not evidence of instability.
    fn default() -> Self {
        Self {
            load_factor: 0.0,
            voltage_stability: 100.0,
            current_stability: 100.0,
        }
    }
}

impl StabilityStats {
    // ---
    pub fn from_samples(samples: &[ParsedSample], power: &PowerStats) -> Self {
        Self {
            load_factor: power.load_factor(),
            voltage_stability: stability_index(&positive_values(samples, |s| s.voltage)),
            current_stability: stability_index(&positive_values(samples, |s| s.current)),
        }
    }
}
