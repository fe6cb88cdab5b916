//! Endpoint table for the mall REST contract.

use super::models::{AddToCartBody, UpdateQuantityBody};
use reqwest::Method;
use serde_json::Value;

/// Filter and cursor for one product list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category_id: Option<i64>,
    pub keyword: Option<String>,
    pub page: u32,
    pub size: u32,
}

impl ProductQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(category_id) = self.category_id {
            pairs.push(("categoryId", category_id.to_string()));
        }
        if let Some(keyword) = &self.keyword {
            pairs.push(("keyword", keyword.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Categories,
    Products(ProductQuery),
    ProductDetail(i64),
    Cart,
    AddToCart { product_id: i64, quantity: u32 },
    UpdateCartItem { item_id: i64, quantity: u32 },
    RemoveCartItem(i64),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Self::Categories => "/mall/categories".to_string(),
            Self::Products(_) => "/mall/products".to_string(),
            Self::ProductDetail(id) => format!("/mall/products/{id}"),
            Self::Cart => "/mall/cart".to_string(),
            Self::AddToCart { .. } => "/mall/cart/add".to_string(),
            Self::UpdateCartItem { item_id, .. } => format!("/mall/cart/{item_id}"),
            Self::RemoveCartItem(item_id) => format!("/mall/cart/{item_id}"),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::AddToCart { .. } => Method::POST,
            Self::UpdateCartItem { .. } => Method::PUT,
            Self::RemoveCartItem(_) => Method::DELETE,
            _ => Method::GET,
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Products(query) => query.query_pairs(),
            _ => Vec::new(),
        }
    }

    pub fn body(&self) -> Option<Value> {
        match self {
            Self::AddToCart {
                product_id,
                quantity,
            } => serde_json::to_value(AddToCartBody {
                product_id: *product_id,
                quantity: *quantity,
            })
            .ok(),
            Self::UpdateCartItem { quantity, .. } => {
                serde_json::to_value(UpdateQuantityBody {
                    quantity: *quantity,
                })
                .ok()
            }
            _ => None,
        }
    }
}
