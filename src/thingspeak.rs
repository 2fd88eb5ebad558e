//! HTTP client for the ThingSpeak telemetry source and command sink.
//!
//! Reads go to `GET /channels/{id}/feeds.json`, relay commands to
//! `POST /update.json` with the state in `field6`.

use std::time::Duration;

use anyhow::Result;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{Config, RawSample};

/// Largest `results` count ThingSpeak serves per feed request.
pub const MAX_FEED_RESULTS: u32 = 8000;

/// Feed field carrying the relay state.
const RELAY_FIELD: &str = "field6";

#[derive(Debug, Error)]
pub enum FeedError {
    // ---
    #[error("ThingSpeak returned {status}")]
    Upstream { status: StatusCode, body: Value },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("unexpected write acknowledgement: {0}")]
    UnexpectedAck(String),

    #[error("THINGSPEAK_WRITE_API_KEY is not configured")]
    MissingWriteKey,
}

/// Channel metadata returned alongside the feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelInfo {
    // ---
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_entry_id: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ChannelFeed {
    pub channel: ChannelInfo,
    /// Oldest to newest, as served.
    pub feeds: Vec<RawSample>,
}

/// Outcome of a relay write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAck {
    Accepted { entry_id: u64 },
    /// ThingSpeak answered `0`: the write was dropped (one write per 15 s).
    RateLimited,
}

#[derive(Debug, Clone)]
pub struct ThingSpeakClient {
    // ---
    http: reqwest::Client,
    base_url: String,
    read_api_key: Option<String>,
    write_api_key: Option<String>,
}

impl ThingSpeakClient {
    // ---
    pub fn new(config: &Config) -> Result<Self> {
        // ---
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.thingspeak_base_url.clone(),
            read_api_key: config.read_api_key.clone(),
            write_api_key: config.write_api_key.clone(),
        })
    }

    /// Fetch the newest `results` entries of a channel.
    ///
    /// Entries that are not JSON objects are skipped; a missing `feeds`
    /// array yields an empty feed.
    pub async fn fetch_feed(&self, channel_id: &str, results: u32) -> Result<ChannelFeed, FeedError> {
        // ---
        let url = format!("{}/channels/{}/feeds.json", self.base_url, channel_id);
        let results = results.min(MAX_FEED_RESULTS).to_string();
        tracing::debug!("Fetching feed from {} (results={})", url, results);

        let mut query = vec![("results", results.as_str())];
        if let Some(key) = self.read_api_key.as_deref() {
            query.push(("api_key", key));
        }

        let response = self.http.get(&url).query(&query).send().await?;
        let body: Value = check_status(response).await?.json().await?;

        let channel = body
            .get("channel")
            .cloned()
            .and_then(|c| serde_json::from_value::<ChannelInfo>(c).ok())
            .unwrap_or_default();

        let feeds = match body.get("feeds").and_then(|f| f.as_array()) {
            Some(items) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| match serde_json::from_value::<RawSample>(item.clone()) {
                    Ok(sample) => Some(sample),
                    Err(e) => {
                        tracing::debug!("Skipping feed entry {}: {} - Raw item: {}", i, e, item);
                        None
                    }
                })
                .collect(),
            None => {
                tracing::debug!("Feed response missing 'feeds' array");
                Vec::new()
            }
        };

        tracing::info!("Fetched {} feed entries from channel {}", feeds.len(), channel_id);
        Ok(ChannelFeed { channel, feeds })
    }

    /// Publish a relay state (0 or 1) for the device to pick up.
    pub async fn write_relay(&self, state: u8) -> Result<WriteAck, FeedError> {
        // ---
        let key = self.write_api_key.as_deref().ok_or(FeedError::MissingWriteKey)?;
        let url = format!("{}/update.json", self.base_url);
        let state = state.to_string();
        tracing::debug!("Writing relay state {} to {}", state, url);

        let response = self
            .http
            .post(&url)
            .query(&[("api_key", key), (RELAY_FIELD, state.as_str())])
            .send()
            .await?;
        let text = check_status(response).await?.text().await?;

        parse_write_ack(&text)
    }
}

/// Turn non-success statuses into [`FeedError::Upstream`], keeping the body.
async fn check_status(response: Response) -> Result<Response, FeedError> {
    // ---
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    Err(FeedError::Upstream { status, body })
}

/// ThingSpeak acknowledges a write with the new entry id (bare or inside an
/// object) and a rejected one with `0`.
fn parse_write_ack(text: &str) -> Result<WriteAck, FeedError> {
    // ---
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|_| FeedError::UnexpectedAck(text.to_string()))?;

    let entry_id = match &value {
        Value::Number(n) => n.as_u64(),
        Value::Object(obj) => obj.get("entry_id").and_then(Value::as_u64),
        _ => None,
    };

    match entry_id {
        Some(0) => Ok(WriteAck::RateLimited),
        Some(entry_id) => Ok(WriteAck::Accepted { entry_id }),
        None => Err(FeedError::UnexpectedAck(text.to_string())),
    }
}
