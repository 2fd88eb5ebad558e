//! Serializable analytics output consumed by dashboards.
//!
//! Field names are camelCase and form the public JSON contract of the
//! appliance data endpoint.

use serde::Serialize;

use crate::models::ParsedSample;

/// Complete result of one analytics computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsBundle {
    // ---
    pub latest: LatestReading,
    pub analytics: Analytics,
    pub charts: Charts,
}

/// User-facing subset of the newest sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestReading {
    // ---
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    pub temperature: f64,
    pub relay_status: u8,
    /// `null` when there is no sample at all.
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    // ---
    pub total_energy: f64,
    pub today_energy: f64,
    pub avg_power: f64,
    pub peak_power: f64,
    pub min_power: f64,
    pub power_fluctuation: f64,
    pub load_factor: f64,
    pub voltage_stability: f64,
    pub current_stability: f64,
    pub energy_cost: f64,
    pub daily_cost: f64,
    pub monthly_projection: f64,
    pub carbon_emission: f64,
    pub max_temperature: f64,
    pub avg_temperature: f64,
    pub overheat_warning: bool,
    /// Hours with the relay ON, 2 dp.
    pub on_time: f64,
    pub off_time: f64,
    pub switch_count: u32,
    pub bulb_lifetime_usage: f64,
    pub alerts: Vec<Alert>,
}

/// Parallel per-sample series plus the daily energy bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    // ---
    pub timestamps: Vec<String>,
    pub power_data: Vec<f64>,
    pub temperature_data: Vec<f64>,
    pub voltage_data: Vec<f64>,
    pub current_data: Vec<f64>,
    pub energy_data: Vec<f64>,
    pub daily_energy: Vec<DailyEnergy>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEnergy {
    pub date: String,
    pub energy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    // ---
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    // ---
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Danger,
            message: message.into(),
        }
    }
}

impl From<&ParsedSample> for LatestReading {
    // ---
    fn from(sample: &ParsedSample) -> Self {
        Self {
            voltage: sample.voltage,
            current: sample.current,
            power: sample.power,
            temperature: sample.temperature,
            relay_status: sample.relay_status,
            timestamp: Some(sample.timestamp.clone()),
        }
    }
}

impl Charts {
    // ---
    pub fn from_samples(samples: &[ParsedSample], daily_energy: Vec<DailyEnergy>) -> Self {
        // ---
        Self {
            timestamps: samples.iter().map(|s| s.timestamp.clone()).collect(),
            power_data: series(samples, |s| s.power),
            temperature_data: series(samples, |s| s.temperature),
            voltage_data: series(samples, |s| s.voltage),
            current_data: series(samples, |s| s.current),
            energy_data: series(samples, |s| s.energy),
            daily_energy,
        }
    }
}

fn series(samples: &[ParsedSample], channel: fn(&ParsedSample) -> f64) -> Vec<f64> {
    samples.iter().map(channel).collect()
}

impl AnalyticsBundle {
    // ---
    /// The bundle for a window with no samples: zeros everywhere except the
    /// stability indices, which report 100 (no evidence of instability).
    pub fn empty() -> Self {
        // ---
        Self {
            latest: LatestReading::default(),
            analytics: Analytics {
                total_energy: 0.0,
                today_energy: 0.0,
                avg_power: 0.0,
                peak_power: 0.0,
                min_power: 0.0,
                power_fluctuation: 0.0,
                load_factor: 0.0,
                voltage_stability: 100.0,
                current_stability: 100.0,
                energy_cost: 0.0,
                daily_cost: 0.0,
                monthly_projection: 0.0,
                carbon_emission: 0.0,
                max_temperature: 0.0,
                avg_temperature: 0.0,
                overheat_warning: false,
                on_time: 0.0,
                off_time: 0.0,
                switch_count: 0,
                bulb_lifetime_usage: 0.0,
                alerts: Vec::new(),
            },
            charts: Charts::default(),
        }
    }
}
