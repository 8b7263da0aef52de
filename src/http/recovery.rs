//! Terminal error handling.
//!
//! Catches panics raised anywhere below it in the middleware stack, logs the
//! full context under a fresh reference, and answers with a generic 500.

use std::panic::AssertUnwindSafe;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use futures_util::FutureExt;
use uuid::Uuid;

use crate::error::panic_message;
use crate::http::response::internal_error;
use crate::http::server::AppState;

pub async fn recover_panics(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let params = request.uri().query().unwrap_or_default().to_owned();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            let reference = format!("ErrorID-{}", Uuid::new_v4());
            tracing::error!(
                reference = %reference,
                error = %panic_message(payload.as_ref()),
                method = %method,
                path = %path,
                params = %params,
                "System error occurred"
            );
            internal_error(&reference, &state.support_contact)
        }
    }
}
