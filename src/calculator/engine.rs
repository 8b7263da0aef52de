//! Operation execution with circuit breaker protection.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::calculator::{ComputeError, Computation, Operands, Operation};
use crate::config::CircuitBreakerConfig;
use crate::error::{panic_message, CalcError};
use crate::resilience::{BreakerError, CircuitBreaker, Clock, SystemClock};
use crate::validation::{self, QueryParams, ValidatedRequest};

/// Evaluates an operation on validated operands.
pub trait Arithmetic: Send + Sync + std::fmt::Debug {
    fn compute(&self, operation: Operation, operands: &Operands) -> f64;
}

/// Native `f64` arithmetic.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ieee754;

impl Arithmetic for Ieee754 {
    fn compute(&self, operation: Operation, operands: &Operands) -> f64 {
        operation.apply(operands)
    }
}

/// Executes validated requests, routing protected operations through a
/// single shared circuit breaker.
#[derive(Debug)]
pub struct Calculator {
    breaker: CircuitBreaker,
    policy: CircuitBreakerConfig,
    arithmetic: Arc<dyn Arithmetic>,
}

impl Calculator {
    pub fn new(policy: CircuitBreakerConfig) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    pub fn with_clock(policy: CircuitBreakerConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_arithmetic(policy, clock, Arc::new(Ieee754))
    }

    pub fn with_arithmetic(
        policy: CircuitBreakerConfig,
        clock: Arc<dyn Clock>,
        arithmetic: Arc<dyn Arithmetic>,
    ) -> Self {
        tracing::info!(
            protected_operations = ?policy.protected_operations,
            "Calculator initialized"
        );
        Self {
            breaker: CircuitBreaker::with_clock("arithmetic", &policy, clock),
            policy,
            arithmetic,
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn is_protected(&self, operation: Operation) -> bool {
        self.policy.is_protected(operation)
    }

    /// Validate raw query parameters and evaluate `operation`.
    pub fn handle(&self, operation: Operation, params: &QueryParams) -> Result<Computation, CalcError> {
        let request = validation::validate(operation, params)?;
        self.evaluate(request)
    }

    /// Evaluate an already validated request.
    ///
    /// Domain checks run before the breaker and never count as failures.
    /// Non-finite results are values, not failures.
    pub fn evaluate(&self, request: ValidatedRequest) -> Result<Computation, CalcError> {
        let (operation, operands) = request.into_parts();

        if let Err(kind) = operation.check_domain(&operands) {
            tracing::error!(
                operation = %operation,
                operands = ?operands.values(),
                error = %kind,
                "Domain error"
            );
            return Err(CalcError::Domain {
                kind,
                operand: operands.first(),
            });
        }

        let result = if self.is_protected(operation) {
            self.breaker
                .call(|| self.compute_guarded(operation, &operands))
                .map_err(|e| {
                    tracing::error!(
                        operation = %operation,
                        operands = ?operands.values(),
                        error = %e,
                        "{} service failure",
                        operation.label()
                    );
                    match e {
                        BreakerError::Open => CalcError::BreakerOpen { operation },
                        BreakerError::Failed(source) => CalcError::ExecutionFailed { operation, source },
                    }
                })?
        } else {
            self.arithmetic.compute(operation, &operands)
        };

        tracing::info!("{}", operation.describe(&operands, result));
        Ok(Computation::new(operation, operands, result))
    }

    /// Run the computation, turning a panic into a recorded failure.
    fn compute_guarded(&self, operation: Operation, operands: &Operands) -> Result<f64, ComputeError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.arithmetic.compute(operation, operands))).map_err(
            |payload| ComputeError::Panicked {
                operation,
                message: panic_message(payload.as_ref()).to_owned(),
            },
        )
    }
}
