//! Pet Mall Library
//!
//! Storefront core for a pet-supplies shop: a typed REST client, the cart
//! and catalog state managers built on it, and an in-memory development
//! backend that speaks the same contract.

// Client
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod notice;

// Domain modules
pub mod cart;
pub mod catalog;

// Development backend
pub mod router;
pub mod server;

pub use app::MallClient;
pub use error::{MallError, MallResult};
