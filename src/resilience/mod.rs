//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Validated operands for a protected operation:
//!     → circuit_breaker.rs (admit, reject fast, or admit a single trial)
//!     → operation runs outside the breaker lock
//!     → outcome recorded; threshold and cooldown drive state transitions
//! ```
//!
//! # Design Decisions
//! - The breaker is synchronous; guarded arithmetic never awaits
//! - Cooldowns are measured on an injected monotonic clock (clock.rs)
//! - Rejection (`Open`) is distinct from an operation failure (`Failed`)

pub mod circuit_breaker;
pub mod clock;

pub use circuit_breaker::{BreakerError, CircuitBreaker, CircuitState};
pub use clock::{Clock, ManualClock, SystemClock};
