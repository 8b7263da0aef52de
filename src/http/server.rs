//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one route per operation plus `/health`
//! - Wire up middleware (request ID, tracing, timeout, request log, panic recovery)
//! - Bind server to listener
//! - Stop on the shutdown signal

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Query, State},
    http::Uri,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::calculator::{Calculator, Operation};
use crate::config::ServiceConfig;
use crate::health;
use crate::http::recovery::recover_panics;
use crate::http::request::{
    log_request, make_request_span, propagate_request_id_layer, set_request_id_layer,
};
use crate::http::response;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<Calculator>,
    pub started_at: Instant,
    pub support_contact: Arc<str>,
}

impl AppState {
    pub fn new(config: &ServiceConfig) -> Self {
        Self::with_calculator(
            config,
            Arc::new(Calculator::new(config.circuit_breaker.clone())),
        )
    }

    pub fn with_calculator(config: &ServiceConfig, calculator: Arc<Calculator>) -> Self {
        Self {
            calculator,
            started_at: health::process_started_at(),
            support_contact: Arc::from(config.support.contact.as_str()),
        }
    }
}

/// HTTP server for the calculator.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let state = AppState::new(&config);
        Self::with_state(config, state)
    }

    /// Create a server around a pre-built calculator (e.g. one with a manual clock).
    pub fn with_calculator(config: ServiceConfig, calculator: Arc<Calculator>) -> Self {
        let state = AppState::with_calculator(&config, calculator);
        Self::with_state(config, state)
    }

    fn with_state(config: ServiceConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut router = Router::new();
        for operation in Operation::ALL {
            router = router.route(
                operation.path(),
                get(move |state: State<AppState>, query: Query<HashMap<String, String>>| {
                    calculate(operation, state, query)
                }),
            );
        }

        router
            .route("/health", get(health::health_check))
            .fallback(route_not_found)
            .layer(middleware::from_fn_with_state(state.clone(), recover_panics))
            .layer(middleware::from_fn(log_request))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// Run the server, accepting connections on the given listener until shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn calculator(&self) -> Arc<Calculator> {
        self.state.calculator.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Validate, compute, and shape the response for one operation.
async fn calculate(
    operation: Operation,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let start_time = Instant::now();

    let response = match state.calculator.handle(operation, &params) {
        Ok(computation) => computation.into_response(),
        Err(e) => e.into_response(),
    };

    metrics::record_request(operation.name(), response.status().as_u16(), start_time);
    response
}

async fn route_not_found(uri: Uri) -> Response {
    tracing::warn!(path = %uri.path(), "No route matched");
    response::not_found(uri.path())
}
