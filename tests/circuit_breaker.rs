//! Circuit breaker behavior as seen by HTTP clients.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use calculator_service::calculator::Calculator;
use calculator_service::config::ServiceConfig;
use calculator_service::http::HttpServer;
use calculator_service::resilience::{CircuitState, Clock, ManualClock, SystemClock};

mod common;

use common::{config_with_breaker, get_json, spawn_server_with, FaultyArithmetic};

fn faulty_calculator(
    config: &ServiceConfig,
    clock: Arc<dyn Clock>,
) -> (Arc<Calculator>, Arc<FaultyArithmetic>) {
    let unit = Arc::new(FaultyArithmetic::default());
    let calculator = Arc::new(Calculator::with_arithmetic(
        config.circuit_breaker.clone(),
        clock,
        unit.clone(),
    ));
    (calculator, unit)
}

#[tokio::test]
async fn test_faults_open_breaker_and_cooldown_recovers() {
    let config = config_with_breaker(3, 200);
    let (calculator, unit) = faulty_calculator(&config, Arc::new(SystemClock));
    let server = spawn_server_with(config, calculator).await;
    let client = &server.client;

    unit.arm();
    for _ in 0..3 {
        let err = client.multiply(2.0, 3.0).await.unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        let body = err.body().unwrap();
        assert_eq!(body["error"], "Service temporarily unavailable");
        assert_eq!(body["fallback"], "Try again later");
        assert!(body.get("reference").is_none());
    }
    assert_eq!(server.calculator.breaker().state(), CircuitState::Open);
    unit.disarm();

    // Every protected operation is rejected, even with good input.
    let err = client.add(1.0, 2.0).await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::SERVICE_UNAVAILABLE));
    let err = client.divide(6.0, 3.0).await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::SERVICE_UNAVAILABLE));

    // Unprotected operations keep answering.
    assert_eq!(client.power(2.0, 3.0).await.unwrap().result, Some(8.0));
    assert_eq!(client.sqrt(16.0).await.unwrap().result, Some(4.0));
    assert_eq!(client.modulo(7.0, 4.0).await.unwrap().result, Some(3.0));
    assert_eq!(client.health().await.unwrap().status, "healthy");

    tokio::time::sleep(Duration::from_millis(300)).await;

    let computation = client.add(1.0, 2.0).await.unwrap();
    assert_eq!(computation.result, Some(3.0));
    assert_eq!(computation.operands["num1"], 1.0);
    assert_eq!(server.calculator.breaker().state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_overflow_never_reaches_breaker() {
    let app = HttpServer::new(config_with_breaker(1, 60_000)).router();

    for _ in 0..5 {
        let (status, _, body) = get_json(&app, "/multiply?num1=1e308&num2=10").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["result"].is_null());
    }

    let (status, _, body) = get_json(&app, "/add?num1=5&num2=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 8.0);
}

#[tokio::test]
async fn test_validation_errors_never_reach_breaker() {
    let config = config_with_breaker(1, 60_000);
    let (calculator, _) = faulty_calculator(&config, Arc::new(SystemClock));
    let server = spawn_server_with(config, calculator).await;
    let client = &server.client;

    let err = client.divide(1.0, 0.0).await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_REQUEST));

    for query in [vec![("num1", "5")], vec![("num1", "x"), ("num2", "1")]] {
        let res = client.get("/add", &query).await.unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    assert_eq!(server.calculator.breaker().state(), CircuitState::Closed);
    assert_eq!(client.add(2.0, 2.0).await.unwrap().result, Some(4.0));
}

#[tokio::test]
async fn test_half_open_trial_decides_next_state() {
    let config = config_with_breaker(2, 5_000);
    let clock = Arc::new(ManualClock::new());
    let (calculator, unit) = faulty_calculator(&config, clock.clone());
    let app = HttpServer::with_calculator(config, calculator.clone()).router();

    unit.arm();
    for _ in 0..2 {
        let (status, _, _) = get_json(&app, "/multiply?num1=2&num2=3").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
    assert_eq!(calculator.breaker().state(), CircuitState::Open);

    clock.advance(Duration::from_millis(4_999));
    let (status, _, _) = get_json(&app, "/subtract?num1=5&num2=1").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // A failing trial reopens and restarts the cooldown.
    clock.advance(Duration::from_millis(1));
    let (status, _, _) = get_json(&app, "/multiply?num1=2&num2=3").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(calculator.breaker().state(), CircuitState::Open);
    unit.disarm();

    clock.advance(Duration::from_millis(4_999));
    let (status, _, _) = get_json(&app, "/add?num1=1&num2=1").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // A successful trial closes it.
    clock.advance(Duration::from_millis(1));
    let (status, _, body) = get_json(&app, "/add?num1=1&num2=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 2.0);
    assert_eq!(calculator.breaker().state(), CircuitState::Closed);
    assert_eq!(calculator.breaker().consecutive_failures(), 0);
}

#[tokio::test]
async fn test_success_resets_failure_count() {
    let config = config_with_breaker(2, 5_000);
    let (calculator, unit) = faulty_calculator(&config, Arc::new(ManualClock::new()));
    let app = HttpServer::with_calculator(config, calculator.clone()).router();

    for _ in 0..3 {
        unit.arm();
        let (status, _, _) = get_json(&app, "/divide?num1=8&num2=2").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        unit.disarm();
        let (status, _, _) = get_json(&app, "/multiply?num1=2&num2=2").await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(calculator.breaker().state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_unguarded_fault_is_an_internal_error() {
    let config = config_with_breaker(1, 60_000);
    let (calculator, unit) = faulty_calculator(&config, Arc::new(ManualClock::new()));
    let app = HttpServer::with_calculator(config, calculator.clone()).router();

    unit.arm();
    let (status, _, body) = get_json(&app, "/power?num1=2&num2=3").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["reference"].as_str().unwrap().starts_with("ErrorID-"));
    assert_eq!(calculator.breaker().state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_breaker() {
    let config = config_with_breaker(10, 60_000);
    let (calculator, unit) = faulty_calculator(&config, Arc::new(ManualClock::new()));
    let server = spawn_server_with(config, calculator).await;
    let base_url = server.base_url();

    unit.arm();
    let mut handles = Vec::new();
    for i in 0..20 {
        let url = format!("{base_url}/multiply?num1=3&num2={i}");
        handles.push(tokio::spawn(async move {
            reqwest::get(url).await.unwrap().status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
    }

    assert_eq!(server.calculator.breaker().state(), CircuitState::Open);
    assert_eq!(server.calculator.breaker().consecutive_failures(), 10);
}
