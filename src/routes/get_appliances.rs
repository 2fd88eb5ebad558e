use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::info;

use crate::registry::{self, Appliance};
use crate::{Config, ThingSpeakClient};

// ---

pub fn router() -> Router<(ThingSpeakClient, Config)> {
    // ---
    Router::new().route("/api/appliances", get(handler))
}

#[derive(Serialize)]
struct AppliancesResponse {
    success: bool,
    count: usize,
    appliances: Vec<Appliance>,
}

async fn handler(State((_client, config)): State<(ThingSpeakClient, Config)>) -> Json<AppliancesResponse> {
    // ---
    let appliances = registry::appliances(&config);
    info!("GET /api/appliances - {} registered", appliances.len());

    Json(AppliancesResponse {
        success: true,
        count: appliances.len(),
        appliances,
    })
}
