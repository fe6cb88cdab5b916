//! Development Backend Helpers
//!
//! Envelope construction, pagination, cart merging and formatting. Kept free
//! of axum extractors so they are easy to test.

use crate::api::models::{ApiEnvelope, CartItem, Pagination, CODE_OK};
use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

/// Builds a success envelope around `data`.
pub fn success<T: Serialize>(data: T) -> Response {
    Json(ApiEnvelope {
        code: CODE_OK,
        message: "success".to_string(),
        data: Some(data),
        pagination: None,
    })
    .into_response()
}

/// Builds a failure envelope whose `code` mirrors the HTTP status.
pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let body: ApiEnvelope<()> = ApiEnvelope {
        code: i64::from(status.as_u16()),
        message: message.into(),
        data: None,
        pagination: None,
    };
    (status, Json(body)).into_response()
}

/// Pagination block for `total` items split into pages of `size`.
pub fn paginate(total: usize, page: u32, size: u32) -> Pagination {
    let size = size.max(1);
    let total_page = total.div_ceil(size as usize) as u32;
    Pagination {
        total_page,
        current_page: page,
        page_pieces: size,
        total_pieces: total as u64,
    }
}

/// Returns the `[start, end)` slice bounds for a 1-based page.
pub fn page_bounds(total: usize, page: u32, size: u32) -> (usize, usize) {
    let size = size.max(1) as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);
    (start, end)
}

/// Merges `quantity` of `product_id` into the cart, aggregating with an
/// existing entry for the same product, and clamps the result to `stock`.
///
/// Returns the id of the affected entry.
pub fn merge_into_cart(
    cart_items: &mut Vec<CartItem>,
    product_id: i64,
    quantity: u32,
    stock: Option<u32>,
    new_id: impl FnOnce() -> i64,
) -> i64 {
    let clamp = |q: u32| stock.map_or(q, |s| q.min(s)).max(1);

    if let Some(existing) = cart_items.iter_mut().find(|i| i.product_id == product_id) {
        existing.quantity = clamp(existing.quantity.saturating_add(quantity));
        return existing.id;
    }

    let id = new_id();
    cart_items.push(CartItem {
        id,
        user_id: None,
        product_id,
        quantity: clamp(quantity),
        create_time: None,
        update_time: None,
        product: None,
    });
    id
}

/// Produces a human-readable one-line summary for a list of cart entries.
///
/// Example output: `"2x #1, 1x #4"`.
pub fn format_item_summary(items: &[CartItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x #{}", i.quantity, i.product_id))
        .collect::<Vec<_>>()
        .join(", ")
}
