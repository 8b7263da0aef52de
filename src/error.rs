//! Error taxonomy for calculator requests.
//!
//! Every variant is recovered locally and rendered as a JSON error body by
//! [`crate::http::response`]. Panics are not represented here; they are
//! caught by the recovery middleware.

use std::any::Any;

use serde::Serialize;

use crate::calculator::{Arity, ComputeError, Operation};

/// Input rejected by an operation's domain check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Division by zero is not allowed")]
    DivisionByZero,

    #[error("Modulo by zero is undefined")]
    ModuloByZero,

    #[error("Square root of negative numbers is not real")]
    NegativeRadicand,
}

impl DomainError {
    pub fn suggestion(&self) -> &'static str {
        match self {
            DomainError::DivisionByZero => "Provide non-zero denominator",
            DomainError::ModuloByZero => "Provide non-zero modulus",
            DomainError::NegativeRadicand => "Provide non-negative number",
        }
    }

    /// Whether the offending operand is echoed back to the client.
    pub fn echoes_operand(&self) -> bool {
        matches!(self, DomainError::NegativeRadicand)
    }
}

/// Raw query values echoed back on an invalid-number failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Received {
    Pair { num1: String, num2: String },
    Single(String),
}

/// Everything that can go wrong between a raw query and a result.
#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error("{}", missing_message(.arity))]
    MissingParameter {
        arity: Arity,
        endpoint: &'static str,
    },

    #[error("{}", invalid_message(.received))]
    InvalidNumber { received: Received },

    #[error("{kind}")]
    Domain { kind: DomainError, operand: f64 },

    #[error("{operation} rejected: circuit breaker is open")]
    BreakerOpen { operation: Operation },

    #[error("{operation} failed inside circuit breaker: {source}")]
    ExecutionFailed {
        operation: Operation,
        source: ComputeError,
    },
}

fn missing_message(arity: &Arity) -> &'static str {
    match arity {
        Arity::Pair => "Both num1 and num2 are required",
        Arity::Single => "num parameter is required",
    }
}

fn invalid_message(received: &Received) -> &'static str {
    match received {
        Received::Pair { .. } => "Both num1 and num2 must be valid numbers",
        Received::Single(_) => "num must be a valid number",
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
