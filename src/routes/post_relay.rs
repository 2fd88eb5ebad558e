use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::AppError;
use crate::registry;
use crate::thingspeak::WriteAck;
use crate::{Config, ThingSpeakClient};

// ---

pub fn router() -> Router<(ThingSpeakClient, Config)> {
    // ---
    Router::new().route("/api/appliance/{id}/relay", post(handler))
}

/// Request body: `{ "state": 0 | 1 }`.
#[derive(Debug, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    state: Option<Value>,
}

#[derive(Serialize)]
struct ApplianceRef {
    id: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayOutcome {
    state: u8,
    state_label: &'static str,
    entry_id: u64,
}

#[derive(Serialize)]
struct RelayResponse {
    success: bool,
    appliance: ApplianceRef,
    relay: RelayOutcome,
}

async fn handler(
    Path(id): Path<String>,
    State((client, config)): State<(ThingSpeakClient, Config)>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<RelayResponse>, AppError> {
    // ---
    let requested = match payload {
        Ok(Json(request)) => request.state,
        Err(rejection) => {
            debug!("POST /api/appliance/{}/relay - unreadable body: {}", id, rejection);
            None
        }
    };
    info!("POST /api/appliance/{}/relay - {:?}", id, requested);

    let appliance =
        registry::find(&config, &id).ok_or_else(|| AppError::NotFound("Appliance not found".to_string()))?;

    let state = relay_state(requested.as_ref())
        .ok_or_else(|| AppError::InvalidInput("State must be 0 (OFF) or 1 (ON)".to_string()))?;

    let ack = client
        .write_relay(state)
        .await
        .map_err(|e| AppError::from_feed(e, "Failed to control relay"))?;

    let WriteAck::Accepted { entry_id } = ack else {
        return Err(AppError::RateLimited);
    };

    info!("Relay of {} set to {} (entry {})", id, state, entry_id);
    Ok(Json(RelayResponse {
        success: true,
        appliance: ApplianceRef {
            id: appliance.appliance_id,
            name: appliance.appliance_name,
        },
        relay: RelayOutcome {
            state,
            state_label: if state == 1 { "ON" } else { "OFF" },
            entry_id,
        },
    }))
}

/// Accept only the JSON numbers 0 and 1.
fn relay_state(value: Option<&Value>) -> Option<u8> {
    // ---
    match value.and_then(Value::as_f64) {
        Some(v) if v == 0.0 => Some(0),
        Some(v) if v == 1.0 => Some(1),
        _ => None,
    }
}
