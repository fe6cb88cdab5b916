//! Shopping Cart Domain Module
//!
//! This module contains the client-side cart logic, including:
//! - Domain models (CartLine, CartAction, CartSummary)
//! - Business logic helpers (summary aggregation, formatting)
//! - State management (CartManager)

pub mod helpers;
pub mod models;
pub mod state;

// Re-export commonly used types for convenience
pub use helpers::summarize;
pub use models::{ActionOutcome, CartAction, CartLine, CartSummary, ProductSnapshot};
pub use state::{CartManager, DEFAULT_MAX_LINE_QUANTITY};
