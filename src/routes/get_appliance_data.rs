use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::leading_int;
use crate::registry::{self, Appliance};
use crate::thingspeak::ChannelInfo;
use crate::{AnalyticsBundle, AnalyticsEngine, Config, ThingSpeakClient};

// ---

pub fn router() -> Router<(ThingSpeakClient, Config)> {
    // ---
    Router::new().route("/api/appliance/{id}/data", get(handler))
}

/// Query parameters for the data endpoint
#[derive(Debug, Deserialize)]
pub struct DataQuery {
    /// Number of feed entries to analyse, read from its leading integer;
    /// absent, non-numeric or non-positive values use the configured default.
    results: Option<String>,
}

impl DataQuery {
    fn results_or(&self, default: u32) -> u32 {
        // ---
        self.results
            .as_deref()
            .and_then(leading_int)
            .filter(|n| *n > 0)
            .map_or(default, |n| u32::try_from(n).unwrap_or(u32::MAX))
    }
}

#[derive(Serialize)]
struct ApplianceSummary {
    id: &'static str,
    name: &'static str,
    #[serde(rename = "deviceId")]
    device_id: &'static str,
    icon: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "ratedPower")]
    rated_power: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSummary {
    id: Option<u64>,
    name: Option<String>,
    last_entry_id: Option<u64>,
    entries_count: usize,
}

#[derive(Serialize)]
struct DataResponse {
    success: bool,
    appliance: ApplianceSummary,
    channel: ChannelSummary,
    #[serde(flatten)]
    bundle: AnalyticsBundle,
}

impl From<&Appliance> for ApplianceSummary {
    fn from(a: &Appliance) -> Self {
        Self {
            id: a.appliance_id,
            name: a.appliance_name,
            device_id: a.device_id,
            icon: a.icon,
            kind: a.kind,
            rated_power: a.rated_power,
        }
    }
}

impl ChannelSummary {
    fn new(info: ChannelInfo, entries_count: usize) -> Self {
        Self {
            id: info.id,
            name: info.name,
            last_entry_id: info.last_entry_id,
            entries_count,
        }
    }
}

async fn handler(
    Path(id): Path<String>,
    Query(params): Query<DataQuery>,
    State((client, config)): State<(ThingSpeakClient, Config)>,
) -> Result<Json<DataResponse>, AppError> {
    // ---
    info!("GET /api/appliance/{}/data - Starting pipeline", id);

    let appliance = registry::find(&config, &id)
        .ok_or_else(|| AppError::NotFound(format!("Appliance with ID \"{}\" not found", id)))?;

    // Step 1: Fetch the feed window
    let results = params.results_or(config.default_results);
    debug!("GET /api/appliance/{}/data - Step 1, results={}", id, results);

    let feed = client
        .fetch_feed(&appliance.channel_id, results)
        .await
        .map_err(|e| AppError::from_feed(e, "Failed to fetch appliance data"))?;

    // Step 2: Compute analytics
    debug!("GET /api/appliance/{}/data - Step 2", id);

    let bundle = AnalyticsEngine::new(config.analytics()).compute(&feed.feeds);

    info!(
        "Pipeline complete for {}: {} entries, {} alerts",
        id,
        feed.feeds.len(),
        bundle.analytics.alerts.len()
    );

    Ok(Json(DataResponse {
        success: true,
        appliance: ApplianceSummary::from(&appliance),
        channel: ChannelSummary::new(feed.channel, feed.feeds.len()),
        bundle,
    }))
}
