//! REST client for the mall backend.
//!
//! Managers depend on the [`MallBackend`] trait only; [`HttpMallBackend`] is
//! the production implementation and tests substitute their own.

pub mod auth;
pub mod endpoint;
pub mod http;
pub mod models;

pub use auth::SessionToken;
pub use endpoint::{Endpoint, ProductQuery};
pub use http::HttpMallBackend;
pub use models::{CartItem, Pagination, Product, ProductCategory};

use crate::error::MallError;
use async_trait::async_trait;
use std::sync::Arc;

/// One page of the product list as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Option<Pagination>,
}

/// Remote operations the storefront needs.
#[async_trait]
pub trait MallBackend: Send + Sync {
    async fn categories(&self) -> Result<Vec<ProductCategory>, MallError>;

    async fn products(&self, query: &ProductQuery) -> Result<ProductPage, MallError>;

    async fn product(&self, id: i64) -> Result<Product, MallError>;

    async fn cart_items(&self) -> Result<Vec<CartItem>, MallError>;

    async fn add_to_cart(&self, product_id: i64, quantity: u32) -> Result<(), MallError>;

    async fn update_cart_item(&self, item_id: i64, quantity: u32) -> Result<(), MallError>;

    async fn remove_cart_item(&self, item_id: i64) -> Result<(), MallError>;
}

/// Backend handle shared by every manager.
pub type SharedBackend = Arc<dyn MallBackend>;
