//! Request-time errors and their JSON responses.
//!
//! Every failure leaves the service as `{ "success": false, "error": ..,
//! "details": .. }` with a status code chosen per error kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::thingspeak::FeedError;

#[derive(Debug, Error)]
pub enum AppError {
    // ---
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("ThingSpeak rate limit. Wait 15 seconds between writes.")]
    RateLimited,

    /// The telemetry API answered with a non-success status.
    #[error("ThingSpeak API error")]
    Upstream { status: StatusCode, details: Value },

    /// Anything else; `message` is user facing, `details` the cause.
    #[error("{message}: {details}")]
    Internal { message: &'static str, details: String },
}

impl AppError {
    // ---
    /// Classify a client failure; `message` names the failed operation.
    pub fn from_feed(err: FeedError, message: &'static str) -> Self {
        // ---
        match err {
            FeedError::Upstream { status, body } => AppError::Upstream {
                status,
                details: body,
            },
            other => AppError::Internal {
                message,
                details: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    // ---
    fn into_response(self) -> Response {
        // ---
        let (status, body) = match self {
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::RateLimited => {
                tracing::warn!("Relay write rejected by ThingSpeak rate limit");
                (StatusCode::TOO_MANY_REQUESTS, json!({ "error": self.to_string() }))
            }
            AppError::Upstream { status, ref details } => {
                tracing::error!("ThingSpeak API error {}: {}", status, details);
                (status, json!({ "error": "ThingSpeak API error", "details": details }))
            }
            AppError::Internal { message, ref details } => {
                tracing::error!("{}: {}", message, details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": message, "details": details }),
                )
            }
        };

        let mut body = body;
        body["success"] = Value::Bool(false);
        (status, Json(body)).into_response()
    }
}
