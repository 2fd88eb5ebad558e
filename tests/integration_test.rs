//! End-to-end tests: the real router in front of an in-process fake
//! ThingSpeak, both bound to ephemeral ports on 127.0.0.1.

use std::collections::HashMap;

use anyhow::Result;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value};

use iot_energy_monitor::{config, routes, ThingSpeakClient};

// ---

const WRITE_KEY_OK: &str = "WRITEKEY";
const WRITE_KEY_LIMITED: &str = "LIMITED";

/// Channel `1001` has three readings, `1002` is empty, anything else is 404.
async fn fake_feed(Path(channel): Path<String>) -> (StatusCode, Json<Value>) {
    // ---
    match channel.as_str() {
        "1001" => (
            StatusCode::OK,
            Json(json!({
                "channel": { "id": 1001, "name": "Bulb telemetry", "last_entry_id": 3 },
                "feeds": [
                    { "created_at": "2024-01-01T10:00:00Z", "entry_id": 1, "field1": "230",
                      "field2": "0.22", "field3": "50", "field4": "10.0", "field5": "30", "field6": "1" },
                    { "created_at": "2024-01-01T11:00:00Z", "entry_id": 2, "field1": "230",
                      "field2": "0.26", "field3": "60", "field4": "10.5", "field5": "35", "field6": "1" },
                    { "created_at": "2024-01-01T12:00:00Z", "entry_id": 3, "field1": "230",
                      "field2": "0.57", "field3": "130", "field4": "11.2", "field5": "55", "field6": "0" }
                ]
            })),
        ),
        "1002" => (
            StatusCode::OK,
            Json(json!({ "channel": { "id": 1002, "name": "Idle" } })),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!(-1))),
    }
}

async fn fake_update(Query(params): Query<HashMap<String, String>>) -> String {
    // ---
    match params.get("api_key").map(String::as_str) {
        Some(WRITE_KEY_OK) => json!({ "channel_id": 1001, "entry_id": 42, "field6": params.get("field6") }).to_string(),
        _ => "0".to_string(),
    }
}

async fn spawn(app: Router) -> Result<String> {
    // ---
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok(format!("http://{}", addr))
}

/// Start the fake upstream and the service; returns the service base URL.
async fn start_service(channel_id: &str, write_key: Option<&str>) -> Result<String> {
    // ---
    let upstream = spawn(
        Router::new()
            .route("/channels/{id}/feeds.json", get(fake_feed))
            .route("/update.json", post(fake_update)),
    )
    .await?;

    let mut vars = HashMap::from([
        ("THINGSPEAK_CHANNEL_ID".to_string(), channel_id.to_string()),
        ("THINGSPEAK_BASE_URL".to_string(), upstream),
    ]);
    if let Some(key) = write_key {
        vars.insert("THINGSPEAK_WRITE_API_KEY".to_string(), key.to_string());
    }
    let cfg = config::load_from(|name| vars.get(name).cloned())?;
    let client = ThingSpeakClient::new(&cfg)?;

    spawn(routes::router(client, cfg)).await
}

#[tokio::test]
async fn health_reports_online() -> Result<()> {
    // ---
    let base = start_service("1001", None).await?;
    let body: Value = Client::new().get(format!("{}/api/health", base)).send().await?.json().await?;

    assert_eq!(body["status"], "online");
    assert!(body["uptime"].as_f64().is_some());
    assert!(body["timestamp"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn appliances_are_listed() -> Result<()> {
    // ---
    let base = start_service("1001", None).await?;
    let body: Value = Client::new().get(format!("{}/api/appliances", base)).send().await?.json().await?;

    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["appliances"][0]["applianceId"], "LOAD_01");
    assert_eq!(body["appliances"][0]["ratedPower"], 60);
    Ok(())
}

#[tokio::test]
async fn appliance_data_carries_analytics() -> Result<()> {
    // ---
    let base = start_service("1001", None).await?;
    let response = Client::new()
        .get(format!("{}/api/appliance/LOAD_01/data?results=50", base))
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await?;

    assert_eq!(body["success"], true);
    assert_eq!(body["appliance"]["id"], "LOAD_01");
    assert_eq!(body["channel"]["id"], 1001);
    assert_eq!(body["channel"]["lastEntryId"], 3);
    assert_eq!(body["channel"]["entriesCount"], 3);

    assert_eq!(body["latest"]["power"], 130.0);
    assert_eq!(body["latest"]["timestamp"], "2024-01-01T12:00:00Z");

    let analytics = &body["analytics"];
    assert_eq!(analytics["avgPower"], 80.0);
    assert_eq!(analytics["peakPower"], 130.0);
    assert_eq!(analytics["totalEnergy"], 11.2);
    assert_eq!(analytics["todayEnergy"], 0.0);
    assert_eq!(analytics["energyCost"], 89.6);
    assert_eq!(analytics["voltageStability"], 100.0);
    assert_eq!(analytics["switchCount"], 1);
    assert_eq!(analytics["onTime"], 2.0);
    assert_eq!(analytics["overheatWarning"], true);

    let alerts = analytics["alerts"].as_array().expect("alerts array");
    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts[0], json!({ "type": "warning", "message": "High power consumption: 130W" }));
    assert_eq!(alerts[1]["type"], "danger");

    assert_eq!(body["charts"]["powerData"], json!([50.0, 60.0, 130.0]));
    assert_eq!(body["charts"]["dailyEnergy"], json!([{ "date": "2024-01-01", "energy": 1.2 }]));
    Ok(())
}

#[tokio::test]
async fn empty_channel_yields_empty_bundle() -> Result<()> {
    // ---
    let base = start_service("1002", None).await?;
    let body: Value = Client::new()
        .get(format!("{}/api/appliance/LOAD_01/data", base))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["success"], true);
    assert_eq!(body["channel"]["entriesCount"], 0);
    assert_eq!(body["latest"]["timestamp"], Value::Null);
    assert_eq!(body["analytics"]["voltageStability"], 100.0);
    assert_eq!(body["analytics"]["currentStability"], 100.0);
    assert_eq!(body["analytics"]["alerts"], json!([]));
    assert_eq!(body["charts"]["timestamps"], json!([]));
    Ok(())
}

#[tokio::test]
async fn malformed_results_parameter_uses_default() -> Result<()> {
    // ---
    let base = start_service("1001", None).await?;
    for results in ["abc", "-5", "50x"] {
        let response = Client::new()
            .get(format!("{}/api/appliance/LOAD_01/data?results={}", base, results))
            .send()
            .await?;
        assert_eq!(response.status(), reqwest::StatusCode::OK, "results={}", results);

        let body: Value = response.json().await?;
        assert_eq!(body["success"], true);
        assert_eq!(body["channel"]["entriesCount"], 3);
    }
    Ok(())
}

#[tokio::test]
async fn unknown_appliance_is_404() -> Result<()> {
    // ---
    let base = start_service("1001", None).await?;
    let response = Client::new()
        .get(format!("{}/api/appliance/LOAD_99/data", base))
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Appliance with ID \"LOAD_99\" not found");
    Ok(())
}

#[tokio::test]
async fn upstream_status_is_passed_through() -> Result<()> {
    // ---
    let base = start_service("9999", None).await?;
    let response = Client::new()
        .get(format!("{}/api/appliance/LOAD_01/data", base))
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "ThingSpeak API error");
    assert_eq!(body["details"], -1);
    Ok(())
}

#[tokio::test]
async fn relay_command_is_forwarded() -> Result<()> {
    // ---
    let base = start_service("1001", Some(WRITE_KEY_OK)).await?;
    let response = Client::new()
        .post(format!("{}/api/appliance/LOAD_01/relay", base))
        .json(&json!({ "state": 1 }))
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["appliance"]["name"], "Bulb");
    assert_eq!(body["relay"], json!({ "state": 1, "stateLabel": "ON", "entryId": 42 }));
    Ok(())
}

#[tokio::test]
async fn relay_rejects_invalid_state() -> Result<()> {
    // ---
    let base = start_service("1001", Some(WRITE_KEY_OK)).await?;
    let response = Client::new()
        .post(format!("{}/api/appliance/LOAD_01/relay", base))
        .json(&json!({ "state": "on" }))
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "State must be 0 (OFF) or 1 (ON)");
    Ok(())
}

#[tokio::test]
async fn relay_unreadable_body_is_json_400() -> Result<()> {
    // ---
    let base = start_service("1001", Some(WRITE_KEY_OK)).await?;
    let url = format!("{}/api/appliance/LOAD_01/relay", base);
    let requests = [
        Client::new().post(&url).body("state=1"),
        Client::new().post(&url).header("content-type", "application/json").body("{state:"),
        Client::new().post(&url).header("content-type", "application/json").body("\"on\""),
        Client::new().post(&url),
    ];

    for request in requests {
        let response = request.send().await?;
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let body: Value = response.json().await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "State must be 0 (OFF) or 1 (ON)");
    }
    Ok(())
}

#[tokio::test]
async fn relay_rate_limit_is_429() -> Result<()> {
    // ---
    let base = start_service("1001", Some(WRITE_KEY_LIMITED)).await?;
    let response = Client::new()
        .post(format!("{}/api/appliance/LOAD_01/relay", base))
        .json(&json!({ "state": 0 }))
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json().await?;
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn relay_without_write_key_is_500() -> Result<()> {
    // ---
    let base = start_service("1001", None).await?;
    let response = Client::new()
        .post(format!("{}/api/appliance/LOAD_01/relay", base))
        .json(&json!({ "state": 1 }))
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Failed to control relay");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_404() -> Result<()> {
    // ---
    let base = start_service("1001", None).await?;
    let response = Client::new().get(format!("{}/api/nope", base)).send().await?;

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "success": false, "error": "Endpoint not found" }));
    Ok(())
}
