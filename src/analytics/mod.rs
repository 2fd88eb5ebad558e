//! Analytics engine: turns a window of raw telemetry samples into the
//! dashboard bundle (latest reading, scalar metrics, chart series).
//!
//! The computation is pure. It reads only its input and its
//! [`AnalyticsConfig`], keeps no state between calls and never fails: bad
//! fields coerce to zero during parsing and an empty window yields
//! [`AnalyticsBundle::empty`].
//!
//! Each submodule is one aggregation pass over the parsed samples:
//! - `power`: average, peak, minimum, fluctuation
//! - `energy`: counter totals and cost
//! - `stability`: load factor, voltage and current stability
//! - `environment`: temperature summary and carbon emission
//! - `relay`: duty cycle and switch count
//! - `daily`: per-date energy buckets
//! - `alerts`: threshold rules over the latest sample

use chrono::{DateTime, Local, TimeZone};

use crate::models::{ParsedSample, RawSample};

mod alerts;
mod bundle;
mod daily;
mod energy;
mod environment;
mod power;
mod relay;
mod stability;
mod stats;

pub use bundle::{Alert, AlertKind, Analytics, AnalyticsBundle, Charts, DailyEnergy, LatestReading};

use energy::EnergyStats;
use environment::{carbon_emission, TemperatureStats};
use power::PowerStats;
use relay::RelayUsage;
use stability::StabilityStats;
use stats::round_to;

// ---

/// Tariff in currency units per kWh used when none is configured.
pub const DEFAULT_TARIFF_PER_KWH: f64 = 8.0;

/// kg CO₂-equivalent per kWh used when none is configured.
pub const DEFAULT_CARBON_FACTOR: f64 = 0.82;

/// Externally supplied pricing and emission constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsConfig {
    // ---
    pub tariff_per_kwh: f64,
    pub carbon_factor: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            tariff_per_kwh: DEFAULT_TARIFF_PER_KWH,
            carbon_factor: DEFAULT_CARBON_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    // ---
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Compute the bundle, with "today" meaning the host's local calendar day.
    pub fn compute(&self, samples: &[RawSample]) -> AnalyticsBundle {
        self.compute_at(samples, &Local::now())
    }

    /// Compute the bundle as of `now`.
    ///
    /// Samples must already be ordered oldest to newest; the last one is
    /// reported as the latest reading whatever its timestamp.
    pub fn compute_at<Tz: TimeZone>(&self, samples: &[RawSample], now: &DateTime<Tz>) -> AnalyticsBundle {
        // ---
        let parsed: Vec<ParsedSample> = samples.iter().map(RawSample::to_parsed).collect();
        match parsed.last() {
            None => AnalyticsBundle::empty(),
            Some(latest) => self.summarize(&parsed, latest, now),
        }
    }

    /// `latest` is the last element of the non-empty `parsed`.
    fn summarize<Tz: TimeZone>(
        &self,
        parsed: &[ParsedSample],
        latest: &ParsedSample,
        now: &DateTime<Tz>,
    ) -> AnalyticsBundle {
        // ---
        let power = PowerStats::from_samples(parsed);
        let energy = EnergyStats::from_samples(parsed, now);
        let cost = energy.costs(self.config.tariff_per_kwh);
        let stability = StabilityStats::from_samples(parsed, &power);
        let temperature = TemperatureStats::from_samples(parsed);
        let relay = RelayUsage::from_samples(parsed);
        let alerts = alerts::evaluate(latest, stability.voltage_stability, power.fluctuation);

        AnalyticsBundle {
            latest: LatestReading::from(latest),
            analytics: Analytics {
                total_energy: energy.total,
                today_energy: energy.today,
                avg_power: power.average,
                peak_power: power.peak,
                min_power: power.minimum,
                power_fluctuation: power.fluctuation,
                load_factor: stability.load_factor,
                voltage_stability: stability.voltage_stability,
                current_stability: stability.current_stability,
                energy_cost: cost.energy_cost,
                daily_cost: cost.daily_cost,
                monthly_projection: cost.monthly_projection,
                carbon_emission: carbon_emission(energy.total, self.config.carbon_factor),
                max_temperature: temperature.max,
                avg_temperature: temperature.average,
                overheat_warning: temperature.overheat,
                on_time: round_to(relay.on_time_hours, 2),
                off_time: round_to(relay.off_time_hours, 2),
                switch_count: relay.switch_count,
                bulb_lifetime_usage: relay.lifetime_usage(),
                alerts,
            },
            charts: Charts::from_samples(parsed, daily::daily_energy(parsed)),
        }
    }
}
