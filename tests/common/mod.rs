//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use calculator_client::CalculatorClient;
use calculator_service::config::ServiceConfig;
use calculator_service::http::HttpServer;
use calculator_service::lifecycle::Shutdown;
use calculator_service::calculator::{Arithmetic, Operands};
use calculator_service::{Calculator, Operation};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// A server running on an ephemeral port. Shuts down when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: CalculatorClient,
    pub calculator: Arc<Calculator>,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn spawn_server(config: ServiceConfig) -> TestServer {
    start(HttpServer::new(config)).await
}

pub async fn spawn_server_with(config: ServiceConfig, calculator: Arc<Calculator>) -> TestServer {
    start(HttpServer::with_calculator(config, calculator)).await
}

async fn start(server: HttpServer) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calculator = server.calculator();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        client: CalculatorClient::new(&format!("http://{}", addr)),
        calculator,
        shutdown,
    }
}

/// Drive the router in-process and decode the JSON body.
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, HeaderMap, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, headers, body)
}

/// Default config with a test-sized breaker.
pub fn config_with_breaker(failure_threshold: u32, cooldown_ms: u64) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.circuit_breaker.failure_threshold = failure_threshold;
    config.circuit_breaker.cooldown_ms = cooldown_ms;
    config
}

/// Arithmetic that panics on every computation while armed.
#[derive(Debug, Default)]
pub struct FaultyArithmetic {
    armed: AtomicBool,
}

impl FaultyArithmetic {
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

impl Arithmetic for FaultyArithmetic {
    fn compute(&self, operation: Operation, operands: &Operands) -> f64 {
        if self.armed.load(Ordering::SeqCst) {
            panic!("arithmetic unit fault");
        }
        operation.apply(operands)
    }
}
