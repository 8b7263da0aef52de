//! Response shaping.
//!
//! # Responsibilities
//! - Render successful computations as JSON
//! - Map every `CalcError` to a status code and JSON error body
//! - Build the generic 500 and 404 bodies
//!
//! # Design Decisions
//! - Every body is JSON and carries a `timestamp`
//! - 503 (breaker) is kept apart from 400-class input errors
//! - 500 bodies never carry internal detail, only an opaque reference

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::calculator::computation::format_timestamp;
use crate::calculator::{Arity, Computation};
use crate::error::CalcError;

/// Current time in the response timestamp format.
pub fn timestamp_now() -> String {
    format_timestamp(&Utc::now())
}

impl IntoResponse for Computation {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

impl CalcError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CalcError::MissingParameter { .. }
            | CalcError::InvalidNumber { .. }
            | CalcError::Domain { .. } => StatusCode::BAD_REQUEST,
            CalcError::BreakerOpen { .. } | CalcError::ExecutionFailed { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    /// Client-facing JSON body.
    pub fn body(&self) -> Value {
        let mut body = Map::new();

        match self {
            CalcError::MissingParameter { arity, endpoint } => {
                body.insert("error".into(), self.to_string().into());
                match arity {
                    Arity::Pair => body.insert(
                        "suggestion".into(),
                        format!("Example: {endpoint}?num1=5&num2=3").into(),
                    ),
                    Arity::Single => body.insert("example".into(), format!("{endpoint}?num=25").into()),
                };
            }
            CalcError::InvalidNumber { received } => {
                body.insert("error".into(), self.to_string().into());
                body.insert("received".into(), json!(received));
            }
            CalcError::Domain { kind, operand } => {
                body.insert("error".into(), kind.to_string().into());
                body.insert("suggestion".into(), kind.suggestion().into());
                if kind.echoes_operand() {
                    body.insert("received".into(), json!(operand));
                }
            }
            CalcError::BreakerOpen { .. } | CalcError::ExecutionFailed { .. } => {
                body.insert("error".into(), "Service temporarily unavailable".into());
                body.insert("fallback".into(), "Try again later".into());
            }
        }

        body.insert("timestamp".into(), timestamp_now().into());
        Value::Object(body)
    }
}

impl IntoResponse for CalcError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Generic 500 body for failures that escaped every handler.
pub fn internal_error(reference: &str, support: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "reference": reference,
            "support": support,
            "timestamp": timestamp_now(),
        })),
    )
        .into_response()
}

/// 404 body for unknown routes.
pub fn not_found(path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "path": path,
            "timestamp": timestamp_now(),
        })),
    )
        .into_response()
}
