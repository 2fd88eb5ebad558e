//! Relay duty cycle and switch counting.
//!
//! Each interval between adjacent samples is charged to the relay state seen
//! at its start. Intervals with an unparseable timestamp on either end count
//! as zero hours.

use super::stats::round_to;
use crate::models::ParsedSample;

/// Rated life of the controlled bulb (incandescent) in hours.
pub const RATED_LIFETIME_HOURS: f64 = 1000.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RelayUsage {
    // ---
    pub on_time_hours: f64,
    pub off_time_hours: f64,
    pub switch_count: u32,
}

impl RelayUsage {
    // ---
    pub fn from_samples(samples: &[ParsedSample]) -> Self {
        // ---
        samples.windows(2).fold(Self::default(), |usage, pair| {
            let (prev, next) = (&pair[0], &pair[1]);
            let hours = elapsed_hours(prev, next);
            let (on, off) = if prev.relay_on() { (hours, 0.0) } else { (0.0, hours) };

            Self {
                on_time_hours: usage.on_time_hours + on,
                off_time_hours: usage.off_time_hours + off,
                switch_count: usage.switch_count + u32::from(prev.relay_status != next.relay_status),
            }
        })
    }

    /// Share of the rated lifetime consumed so far, in percent (linear wear).
    pub fn lifetime_usage(&self) -> f64 {
        round_to(self.on_time_hours / RATED_LIFETIME_HOURS * 100.0, 2)
    }
}

fn elapsed_hours(prev: &ParsedSample, next: &ParsedSample) -> f64 {
    // ---
    match (prev.recorded_at, next.recorded_at) {
        (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / MILLIS_PER_HOUR,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::analytics::tests::sample;

    #[test]
    fn test_interval_charged_to_starting_state() {
        // ---
        let samples = vec![
            sample("2025-01-01T10:00:00Z").relay(1),
            sample("2025-01-01T11:00:00Z").relay(0),
            sample("2025-01-01T13:30:00Z").relay(1),
            sample("2025-01-01T14:00:00Z").relay(1),
        ];
        let usage = RelayUsage::from_samples(&samples);

        assert_eq!(usage.on_time_hours, 1.5);
        assert_eq!(usage.off_time_hours, 2.5);
        assert_eq!(usage.switch_count, 2);
        assert_eq!(usage.lifetime_usage(), 0.15);
    }

    #[test]
    fn test_switch_count_includes_first_transition() {
        // ---
        let states = [0, 1, 1, 0, 1, 0, 0];
        let samples: Vec<_> = states
            .iter()
            .enumerate()
            .map(|(i, r)| sample(&format!("2025-01-01T10:{:02}:00Z", i)).relay(*r))
            .collect();

        let expected = states.windows(2).filter(|w| w[0] != w[1]).count() as u32;
        assert_eq!(RelayUsage::from_samples(&samples).switch_count, expected);
        assert_eq!(expected, 4);
    }

    #[test]
    fn test_constant_state_never_switches() {
        // ---
        for len in [0, 1, 2, 50] {
            let samples: Vec<_> = (0..len)
                .map(|i| sample(&format!("2025-01-01T{:02}:00:00Z", i % 24)).relay(1))
                .collect();
            assert_eq!(RelayUsage::from_samples(&samples).switch_count, 0);
        }
    }

    #[test]
    fn test_on_plus_off_equals_elapsed() {
        // ---
        let samples = vec![
            sample("2025-01-01T00:00:00Z").relay(0),
            sample("2025-01-01T00:20:00Z").relay(1),
            sample("2025-01-01T03:05:00Z").relay(1),
            sample("2025-01-01T07:45:00Z").relay(0),
            sample("2025-01-02T01:00:00Z").relay(1),
        ];
        let usage = RelayUsage::from_samples(&samples);

        assert!((usage.on_time_hours + usage.off_time_hours - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_unparseable_timestamps_add_no_time() {
        // ---
        let samples = vec![
            sample("2025-01-01T00:00:00Z").relay(1),
            sample("garbage").relay(0),
            sample("2025-01-01T02:00:00Z").relay(0),
        ];
        let usage = RelayUsage::from_samples(&samples);

        assert_eq!(usage.on_time_hours, 0.0);
        assert_eq!(usage.off_time_hours, 0.0);
        assert_eq!(usage.switch_count, 1);
    }
}
