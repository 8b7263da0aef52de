//! Request validation.
//!
//! # Data Flow
//! ```text
//! raw query map
//!     → query.rs (required keys present? per operation arity)
//!     → numeric.rs (each value matches the numeric-literal grammar, finite)
//!     → ValidatedRequest (operation + typed operands)
//! ```
//!
//! Only a [`ValidatedRequest`] reaches the calculator, so handlers never see
//! raw strings.

pub mod numeric;
pub mod query;

pub use numeric::{is_numeric_literal, parse_operand};
pub use query::{validate, QueryParams, ValidatedRequest};
