//! Async client for the calculator service.

mod client;

pub use client::{CalculatorClient, ClientError, Computation, Health};
