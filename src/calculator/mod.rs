//! Arithmetic operations.
//!
//! # Data Flow
//! ```text
//! ValidatedRequest
//!     → operation.rs (domain check: zero divisor, negative radicand)
//!     → engine.rs (protected? run inside the circuit breaker : run directly)
//!     → computation.rs (result stamped with timestamp, serialized for the client)
//! ```

pub mod computation;
pub mod engine;
pub mod operation;

pub use computation::Computation;
pub use engine::{Arithmetic, Calculator, Ieee754};
pub use operation::{Arity, ComputeError, Operands, Operation};
