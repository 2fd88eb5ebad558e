//! Power statistics over strictly positive power readings.

use super::stats::{max_of, mean, min_of, population_std_dev, positive_values, round_to};
use crate::models::ParsedSample;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerStats {
    // ---
    /// Mean power in watts, 2 dp.
    pub average: f64,
    pub peak: f64,
    pub minimum: f64,
    /// Coefficient of variation in percent, 2 dp.
    pub fluctuation: f64,
}

impl PowerStats {
    // ---
    pub fn from_samples(samples: &[ParsedSample]) -> Self {
        // ---
        let powers = positive_values(samples, |s| s.power);
        let (Some(avg), Some(peak), Some(minimum)) =
            (mean(&powers), max_of(&powers), min_of(&powers))
        else {
            return Self::default();
        };

        let average = round_to(avg, 2);
        // Sub-centiwatt readings round the average to 0.
        let fluctuation = if average > 0.0 {
            round_to(population_std_dev(&powers) / average * 100.0, 2)
        } else {
            0.0
        };

        Self {
            average,
            peak: round_to(peak, 2),
            minimum: round_to(minimum, 2),
            fluctuation,
        }
    }

    /// Average as a percentage of peak, 0 without a peak.
    pub fn load_factor(&self) -> f64 {
        // ---
        if self.peak > 0.0 {
            round_to(self.average / self.peak * 100.0, 2)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::analytics::tests::sample;

    #[test]
    fn test_power_stats_skip_non_positive_readings() {
        // ---
        let samples = vec![
            sample("2025-01-01T00:00:00Z").power(0.0),
            sample("2025-01-01T00:01:00Z").power(50.0),
            sample("2025-01-01T00:02:00Z").power(-4.0),
            sample("2025-01-01T00:03:00Z").power(60.0),
            sample("2025-01-01T00:04:00Z").power(130.0),
        ];
        let stats = PowerStats::from_samples(&samples);

        assert_eq!(stats.average, 80.0);
        assert_eq!(stats.peak, 130.0);
        assert_eq!(stats.minimum, 50.0);
        // sd of [50, 60, 130] is 35.59
        assert_eq!(stats.fluctuation, 44.49);
        assert_eq!(stats.load_factor(), 61.54);
    }

    #[test]
    fn test_power_stats_without_positive_power() {
        // ---
        let samples = vec![sample("2025-01-01T00:00:00Z").power(0.0)];
        let stats = PowerStats::from_samples(&samples);

        assert_eq!(stats, PowerStats::default());
        assert_eq!(stats.load_factor(), 0.0);
    }

    #[test]
    fn test_average_bounded_by_peak_and_minimum() {
        // ---
        let readings = [0.4, 12.0, 7.25, 99.9, 3.3, 0.0, 41.0];
        let samples: Vec<_> = readings
            .iter()
            .map(|p| sample("2025-01-01T00:00:00Z").power(*p))
            .collect();
        let stats = PowerStats::from_samples(&samples);

        assert!(stats.average <= stats.peak);
        assert!(stats.minimum >= 0.0);
        assert!(stats.minimum <= stats.average);
    }

    #[test]
    fn test_tiny_power_rounds_to_zero_average_without_fluctuation() {
        // ---
        let samples = vec![
            sample("2025-01-01T00:00:00Z").power(0.001),
            sample("2025-01-01T00:01:00Z").power(0.002),
        ];
        let stats = PowerStats::from_samples(&samples);

        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.fluctuation, 0.0);
        assert!(stats.fluctuation.is_finite());

        let single = PowerStats::from_samples(&[sample("2025-01-01T00:00:00Z").power(0.004)]);
        assert_eq!(single.fluctuation, 0.0);
        assert_eq!(single.peak, 0.0);
    }

    #[test]
    fn test_constant_power_has_no_fluctuation() {
        // ---
        let samples: Vec<_> = (0..5)
            .map(|_| sample("2025-01-01T00:00:00Z").power(60.0))
            .collect();
        let stats = PowerStats::from_samples(&samples);

        assert_eq!(stats.fluctuation, 0.0);
        assert_eq!(stats.load_factor(), 100.0);
    }
}
