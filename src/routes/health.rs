// src/routes/health.rs
//! API health check endpoint for the energy monitor.
//!
//! This module defines the `/api/health` route used by container
//! orchestrators and the dashboard to verify that the service is running and
//! able to respond to HTTP requests. It is a sibling module in the `routes`
//! directory and follows the Explicit Module Boundary Pattern (EMBP):
//! - Internal to this file: endpoint handler(s) and related types
//! - Exports to the gateway (`mod.rs`): a subrouter containing the health route

use std::time::Instant;

use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// JSON response body for the `/api/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    /// Seconds since the router was built.
    uptime: f64,
    timestamp: String,
}

/// Handle `GET /api/health`.
///
/// Deliberately lightweight: it does not contact the telemetry source.
async fn health(started: Instant) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online",
        uptime: started.elapsed().as_secs_f64(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Create a subrouter containing the `/api/health` route.
///
/// This router is generic over the application state so it can merge cleanly
/// with the gateway router, regardless of the state type.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let started = Instant::now();
    Router::new().route("/api/health", get(move || health(started)))
}
