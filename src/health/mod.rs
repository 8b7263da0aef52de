//! Liveness probe.
//!
//! `/health` bypasses validation and the circuit breaker and always answers
//! 200 while the process is serving.

use std::sync::OnceLock;
use std::time::Instant;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::response::timestamp_now;
use crate::http::server::AppState;

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

/// Instant the process started.
///
/// The first call records it, so `main` calls this before anything else.
pub fn process_started_at() -> Instant {
    *PROCESS_START.get_or_init(Instant::now)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Seconds since the process started.
    pub uptime: f64,
    pub timestamp: String,
}

/// Basic health check endpoint: GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: timestamp_now(),
    })
}
