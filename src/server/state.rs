//! Development Backend State
//!
//! In-memory catalogue plus one cart per session token.

use super::seed;
use crate::api::models::{CartItem, Product, ProductCategory};
use dashmap::DashMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state containing the catalogue and carts
pub struct AppState {
    pub categories: Vec<ProductCategory>,
    pub products: Vec<Product>,

    /// Carts keyed by session token.
    /// DashMap allows concurrent access without external Mutexes.
    pub carts: DashMap<String, Vec<CartItem>>,

    next_item_id: AtomicI64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::seeded()
    }
}

impl AppState {
    pub fn new(categories: Vec<ProductCategory>, products: Vec<Product>) -> Self {
        Self {
            categories,
            products,
            carts: DashMap::new(),
            next_item_id: AtomicI64::new(1),
        }
    }

    /// State preloaded with the sample pet-supplies catalogue.
    pub fn seeded() -> Self {
        Self::new(seed::categories(), seed::products())
    }

    pub fn product(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn next_item_id(&self) -> i64 {
        self.next_item_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Cart entries with their product embedded, as the list endpoint
    /// returns them.
    pub fn cart_view(&self, token: &str) -> Vec<CartItem> {
        self.carts
            .get(token)
            .map(|items| {
                items
                    .iter()
                    .map(|item| CartItem {
                        product: self.product(item.product_id).cloned(),
                        ..item.clone()
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
