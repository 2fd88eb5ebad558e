use axum::{http::StatusCode, response::IntoResponse, Json, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{Config, ThingSpeakClient};

mod get_appliance_data;
mod get_appliances;
mod health;
mod post_relay;

// ---

pub fn router(client: ThingSpeakClient, config: Config) -> Router {
    // ---
    Router::new()
        .merge(get_appliances::router())
        .merge(get_appliance_data::router())
        .merge(post_relay::router())
        .merge(health::router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state((client, config))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Endpoint not found" })),
    )
}
