//! `iot-energy-monitor`: energy analytics over appliance telemetry feeds.
//!
//! The crate is split along the Explicit Module Boundary Pattern (EMBP):
//! - `analytics` is the pure computation from raw samples to the dashboard bundle
//! - `thingspeak` talks to the telemetry source and relay command sink
//! - `routes` is the HTTP gateway; sub-routers only see what this file re-exports
//! - `config`, `error`, `models`, `registry` are the supporting pieces

pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod routes;
pub mod thingspeak;

pub use config::Config;

// Re-exported so routes/*.rs and other modules depend on this gateway rather
// than on each other's file layout.
pub use analytics::{AnalyticsBundle, AnalyticsConfig, AnalyticsEngine};
pub use models::{ParsedSample, RawSample};
pub use thingspeak::ThingSpeakClient;
