//! Request identification and logging.
//!
//! # Responsibilities
//! - Assign a UUID v4 request ID unless the client sent one
//! - Echo the request ID on the response
//! - Open a tracing span per request carrying method, URI and request ID
//! - Log every incoming request before validation

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{header, HeaderName},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::Span;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer that stamps `x-request-id` on incoming requests.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Span for the tower-http trace layer.
pub fn make_request_span(request: &axum::http::Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Log the request as received.
pub async fn log_request(request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    tracing::info!(
        method = %request.method(),
        url = %request.uri(),
        ip = client.as_deref().unwrap_or("unknown"),
        user_agent = user_agent.unwrap_or("unknown"),
        "Request received"
    );

    next.run(request).await
}
