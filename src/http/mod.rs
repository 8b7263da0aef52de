//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, one route per operation)
//!     → request.rs (request ID, span, "Request received" log)
//!     → recovery.rs (panics → 500 with reference)
//!     → calculator (validate, compute)
//!     → response.rs (JSON success or error body)
//!     → Send to client
//! ```

pub mod recovery;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
