//! Circuit breaker guarding operation execution.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: downstream assumed unhealthy, calls fail fast
//! - Half-Open: a single trial call probes recovery
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= failure_threshold
//! Open → Half-Open: cooldown elapsed since opening (checked on next call)
//! Half-Open → Closed: trial call succeeds
//! Half-Open → Open: trial call fails (cooldown restarts)
//! ```
//!
//! State, failure counter and trial flag live behind one mutex. The guarded
//! operation itself runs outside the lock, so a slow operation never blocks
//! other callers from being rejected.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;
use crate::resilience::clock::{Clock, SystemClock};

/// Breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a guarded call did not produce a value.
#[derive(Debug, thiserror::Error)]
pub enum BreakerError<E> {
    /// Rejected without running the operation.
    #[error("circuit breaker is open")]
    Open,

    /// The operation ran and failed; the failure was recorded.
    #[error("operation failed: {0}")]
    Failed(E),
}

/// What the caller was allowed to do when the call was admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Permit {
    Normal,
    Trial,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Synchronous circuit breaker.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    failure_threshold: u32,
    cooldown: Duration,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a breaker driven by the system monotonic clock.
    pub fn new(name: impl Into<String>, config: &CircuitBreakerConfig) -> Self {
        Self::with_clock(name, config, Arc::new(SystemClock))
    }

    /// Create a breaker with an injected clock.
    pub fn with_clock(
        name: impl Into<String>,
        config: &CircuitBreakerConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let name = name.into();
        tracing::info!(
            breaker = %name,
            failure_threshold = config.failure_threshold,
            cooldown_ms = config.cooldown_ms,
            "Circuit breaker initialized"
        );

        Self {
            name,
            failure_threshold: config.failure_threshold.max(1),
            cooldown: config.cooldown(),
            clock,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state as last recorded.
    ///
    /// An open breaker whose cooldown has elapsed still reports `Open` until
    /// the next call promotes it to `HalfOpen`.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    /// Run `operation` under breaker protection.
    pub fn call<T, E, F>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let Some(permit) = self.try_acquire() else {
            tracing::debug!(breaker = %self.name, "Circuit open, rejecting call");
            metrics::record_breaker_rejection(&self.name);
            return Err(BreakerError::Open);
        };

        let mut guard = CallGuard {
            breaker: self,
            permit,
            settled: false,
        };
        let result = operation();
        guard.settle(result.is_ok());

        result.map_err(BreakerError::Failed)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_acquire(&self) -> Option<Permit> {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => Some(Permit::Normal),
            CircuitState::Open => {
                let cooled = inner.opened_at.map_or(true, |at| {
                    self.clock.now().saturating_duration_since(at) >= self.cooldown
                });
                if !cooled {
                    return None;
                }
                self.transition(&mut inner, CircuitState::HalfOpen);
                inner.trial_in_flight = true;
                Some(Permit::Trial)
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    None
                } else {
                    inner.trial_in_flight = true;
                    Some(Permit::Trial)
                }
            }
        }
    }

    fn on_success(&self, permit: Permit) {
        let mut inner = self.lock();
        match permit {
            Permit::Trial => {
                inner.trial_in_flight = false;
                inner.consecutive_failures = 0;
                inner.opened_at = None;
                self.transition(&mut inner, CircuitState::Closed);
            }
            Permit::Normal => {
                if inner.state == CircuitState::Closed {
                    inner.consecutive_failures = 0;
                }
            }
        }
    }

    fn on_failure(&self, permit: Permit) {
        let mut inner = self.lock();
        match permit {
            Permit::Trial => {
                inner.trial_in_flight = false;
                self.trip(&mut inner);
            }
            Permit::Normal => {
                // Outcomes of calls admitted before the breaker opened are ignored.
                if inner.state != CircuitState::Closed {
                    return;
                }
                inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
                tracing::debug!(
                    breaker = %self.name,
                    consecutive_failures = inner.consecutive_failures,
                    failure_threshold = self.failure_threshold,
                    "Guarded call failed"
                );
                if inner.consecutive_failures >= self.failure_threshold {
                    self.trip(&mut inner);
                }
            }
        }
    }

    fn trip(&self, inner: &mut Inner) {
        inner.opened_at = Some(self.clock.now());
        self.transition(inner, CircuitState::Open);
    }

    fn transition(&self, inner: &mut Inner, to: CircuitState) {
        let from = inner.state;
        if from == to {
            return;
        }
        inner.state = to;

        match to {
            CircuitState::Open => tracing::error!(
                breaker = %self.name,
                from = %from,
                consecutive_failures = inner.consecutive_failures,
                cooldown_ms = self.cooldown.as_millis() as u64,
                "Circuit breaker opened"
            ),
            _ => tracing::info!(breaker = %self.name, from = %from, to = %to, "Circuit breaker state change"),
        }
        metrics::record_breaker_transition(&self.name, to);
    }
}

/// Settles the admitted call exactly once. A call that unwinds before
/// settling is recorded as a failure so a half-open trial cannot wedge.
struct CallGuard<'a> {
    breaker: &'a CircuitBreaker,
    permit: Permit,
    settled: bool,
}

impl CallGuard<'_> {
    fn settle(&mut self, success: bool) {
        self.settled = true;
        if success {
            self.breaker.on_success(self.permit);
        } else {
            self.breaker.on_failure(self.permit);
        }
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.on_failure(self.permit);
        }
    }
}
