//! Configuration loader for the `iot-energy-monitor` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Values are read through a lookup function so the
//! same parsing runs against the process environment and against test maps.
use std::env;

use anyhow::{anyhow, Result};

use crate::analytics::{AnalyticsConfig, DEFAULT_CARBON_FACTOR, DEFAULT_TARIFF_PER_KWH};

/// Public ThingSpeak API endpoint.
pub const DEFAULT_THINGSPEAK_BASE_URL: &str = "https://api.thingspeak.com";

/// Parse an optional environment variable of type `$ty` with a default value.
macro_rules! parse_env {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// HTTP listen port.
    pub port: u16,

    /// Base URL of the ThingSpeak-compatible telemetry API.
    pub thingspeak_base_url: String,

    /// Channel holding the bulb's telemetry feed.
    pub channel_id: String,

    /// Read key; `None` for public channels.
    pub read_api_key: Option<String>,

    /// Write key used for relay commands.
    pub write_api_key: Option<String>,

    /// Tariff in currency units per kWh.
    pub energy_tariff: f64,

    /// kg CO₂-equivalent per kWh.
    pub carbon_factor: f64,

    /// Feed entries fetched when the request does not ask for a count.
    pub default_results: u32,

    /// Timeout applied to every upstream request.
    pub upstream_timeout_secs: u64,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `THINGSPEAK_CHANNEL_ID` – telemetry channel of the bulb
///
/// Optional:
/// - `THINGSPEAK_READ_API_KEY` / `THINGSPEAK_WRITE_API_KEY`
/// - `THINGSPEAK_BASE_URL` (default: `https://api.thingspeak.com`)
/// - `PORT` (default: 5000)
/// - `ENERGY_TARIFF` (default: 8.0) and `CARBON_FACTOR` (default: 0.82)
/// - `FEED_RESULTS_DEFAULT` (default: 100)
/// - `UPSTREAM_TIMEOUT_SECS` (default: 10)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    load_from(|name| env::var(name).ok())
}

/// Same as [`load_from_env`] but reading variables through `lookup`.
pub fn load_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let channel_id = require_env!(optional, "THINGSPEAK_CHANNEL_ID");
    let thingspeak_base_url = optional("THINGSPEAK_BASE_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_THINGSPEAK_BASE_URL.to_string());
    let port = parse_env!(optional, "PORT", u16, 5000);
    let energy_tariff = parse_env!(optional, "ENERGY_TARIFF", f64, DEFAULT_TARIFF_PER_KWH);
    let carbon_factor = parse_env!(optional, "CARBON_FACTOR", f64, DEFAULT_CARBON_FACTOR);
    let default_results = parse_env!(optional, "FEED_RESULTS_DEFAULT", u32, 100);
    let upstream_timeout_secs = parse_env!(optional, "UPSTREAM_TIMEOUT_SECS", u64, 10);

    Ok(Config {
        port,
        thingspeak_base_url,
        channel_id,
        read_api_key: optional("THINGSPEAK_READ_API_KEY"),
        write_api_key: optional("THINGSPEAK_WRITE_API_KEY"),
        energy_tariff,
        carbon_factor,
        default_results,
        upstream_timeout_secs,
    })
}

impl Config {
    // ---
    /// Pricing and emission constants for the analytics engine.
    pub fn analytics(&self) -> AnalyticsConfig {
        AnalyticsConfig {
            tariff_per_kwh: self.energy_tariff,
            carbon_factor: self.carbon_factor,
        }
    }

    /// Log the loaded configuration for debugging purposes.
    ///
    /// API keys are masked; everything else is shown as loaded.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  PORT                     : {}", self.port);
        tracing::info!("  THINGSPEAK_BASE_URL      : {}", self.thingspeak_base_url);
        tracing::info!("  THINGSPEAK_CHANNEL_ID    : {}", self.channel_id);
        tracing::info!("  THINGSPEAK_READ_API_KEY  : {}", mask_key(self.read_api_key.as_deref()));
        tracing::info!("  THINGSPEAK_WRITE_API_KEY : {}", mask_key(self.write_api_key.as_deref()));
        tracing::info!("  ENERGY_TARIFF            : {}", self.energy_tariff);
        tracing::info!("  CARBON_FACTOR            : {}", self.carbon_factor);
        tracing::info!("  FEED_RESULTS_DEFAULT     : {}", self.default_results);
        tracing::info!("  UPSTREAM_TIMEOUT_SECS    : {}", self.upstream_timeout_secs);
    }
}

/// Show only the first four characters of a key.
fn mask_key(key: Option<&str>) -> String {
    // ---
    match key {
        Some(key) => format!("{}****", key.chars().take(4).collect::<String>()),
        None => "(unset)".to_string(),
    }
}
