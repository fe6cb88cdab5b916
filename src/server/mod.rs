//! Development Mall Backend
//!
//! An in-memory implementation of the mall REST contract, used by the
//! `serve` command and by end-to-end tests of the HTTP client:
//! - Sample catalogue (seed)
//! - Envelope and pagination helpers
//! - Application state (catalogue + per-session carts)
//! - REST handlers

pub mod handlers;
pub mod helpers;
pub mod seed;
pub mod state;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use state::{AppState, SharedState};
