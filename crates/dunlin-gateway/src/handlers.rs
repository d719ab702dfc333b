// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway API.
//!
//! Handles POST /v1/runs and GET /health.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use dunlin_engine::run_daily_pass;

use crate::server::GatewayState;

/// Request body for POST /v1/runs. The body is optional; an absent or empty
/// body runs the pass as of today (UTC).
#[derive(Debug, Default, Deserialize)]
pub struct RunRequest {
    /// Reference date for the pass as `YYYY-MM-DD`. Lets a manual
    /// invocation (or a test) pin the evaluation day.
    #[serde(default)]
    pub as_of: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// POST /v1/runs
///
/// Runs one batch pass and returns its summary. Per-invoice failures are
/// inside the summary; only a fatal pass error (cannot fetch the invoice
/// list) produces a 500.
pub async fn post_runs(State(state): State<GatewayState>, body: Bytes) -> Response {
    let request: RunRequest = if body.is_empty() {
        RunRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("invalid request body: {e}"),
                    }),
                )
                    .into_response();
            }
        }
    };

    let as_of = match &request.as_of {
        Some(raw) => match chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("invalid as_of date `{raw}`: {e}"),
                    }),
                )
                    .into_response();
            }
        },
        None => chrono::Utc::now().date_naive(),
    };

    match run_daily_pass(&state.db, as_of, &state.engine).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!(error = %e, "collections pass failed fatally");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
///
/// Unauthenticated liveness endpoint for schedulers and probes.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
