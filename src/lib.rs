//! Calculator microservice library.
//!
//! Arithmetic over query parameters, with explicit numeric validation, a
//! circuit breaker around protected operations, and uniform JSON responses.

pub mod calculator;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod validation;

pub use calculator::{Calculator, Operation};
pub use config::schema::ServiceConfig;
pub use error::CalcError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
