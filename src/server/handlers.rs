//! REST handlers for the development mall backend.
//!
//! Catalogue endpoints are public; cart endpoints require a bearer token and
//! operate on the cart stored under that token.

use super::{
    helpers::{failure, format_item_summary, merge_into_cart, page_bounds, paginate, success},
    state::SharedState,
};
use crate::api::{
    auth::strip_bearer,
    models::{AddToCartBody, Product, ProductListData, UpdateQuantityBody},
};
use crate::catalog::DEFAULT_PAGE_SIZE;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, info};

/// Creates routes for the mall endpoints
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/mall/categories", get(list_categories))
        .route("/mall/products", get(list_products))
        .route("/mall/products/:id", get(product_detail))
        .route("/mall/cart", get(list_cart))
        .route("/mall/cart/add", post(add_to_cart))
        .route("/mall/cart/:id", put(update_cart_item).delete(remove_cart_item))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    pub category_id: Option<i64>,
    pub keyword: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ProductListParams {
    fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category_id
            .map_or(true, |id| id == 0 || product.category_id == id);

        let keyword_ok = match self.keyword.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(keyword) => {
                let needle = keyword.to_lowercase();
                [Some(&product.name), product.brand.as_ref(), product.description.as_ref()]
                    .into_iter()
                    .flatten()
                    .any(|text| text.to_lowercase().contains(&needle))
            }
        };

        category_ok && keyword_ok
    }
}

/// Resolves the session token from the `Authorization` header.
fn session_token(headers: &HeaderMap) -> Result<String, Response> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(strip_bearer)
        .map(str::to_string)
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "login required"))
}

/// Endpoint: GET /mall/categories
async fn list_categories(State(state): State<SharedState>) -> Response {
    let mut categories = state.categories.clone();
    categories.sort_by_key(|c| c.sort.unwrap_or(i32::MAX));
    success(categories)
}

/// Endpoint: GET /mall/products
async fn list_products(
    State(state): State<SharedState>,
    Query(params): Query<ProductListParams>,
) -> Response {
    let page = params.page.unwrap_or(1).max(1);
    let size = params.size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE);

    let matching: Vec<&Product> = state.products.iter().filter(|p| params.matches(p)).collect();
    let (start, end) = page_bounds(matching.len(), page, size);
    let products = matching[start..end].iter().map(|p| (*p).clone()).collect();

    debug!(?params, total = matching.len(), "product list");
    success(ProductListData {
        products: Some(products),
        pagination: Some(paginate(matching.len(), page, size)),
    })
}

/// Endpoint: GET /mall/products/{id}
async fn product_detail(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    match state.product(id) {
        Some(product) => success(product),
        None => failure(StatusCode::NOT_FOUND, format!("product {id} not found")),
    }
}

/// Endpoint: GET /mall/cart
async fn list_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let token = match session_token(&headers) {
        Ok(token) => token,
        Err(response) => return response,
    };
    success(state.cart_view(&token))
}

/// Endpoint: POST /mall/cart/add
/// Aggregates with an existing entry for the same product.
async fn add_to_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<AddToCartBody>,
) -> Response {
    let token = match session_token(&headers) {
        Ok(token) => token,
        Err(response) => return response,
    };
    if payload.quantity == 0 {
        return failure(StatusCode::BAD_REQUEST, "quantity must be at least 1");
    }
    let Some(product) = state.product(payload.product_id) else {
        return failure(
            StatusCode::NOT_FOUND,
            format!("product {} not found", payload.product_id),
        );
    };
    if product.stock == Some(0) {
        return failure(StatusCode::BAD_REQUEST, format!("{} is out of stock", product.name));
    }

    let mut cart_items = state.carts.entry(token).or_default();
    let item_id = merge_into_cart(
        &mut cart_items,
        payload.product_id,
        payload.quantity,
        product.stock,
        || state.next_item_id(),
    );
    info!(item_id, cart = %format_item_summary(&cart_items), "cart add");

    success(serde_json::json!({ "id": item_id }))
}

/// Endpoint: PUT /mall/cart/{itemId}
async fn update_cart_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(item_id): Path<i64>,
    Json(payload): Json<UpdateQuantityBody>,
) -> Response {
    let token = match session_token(&headers) {
        Ok(token) => token,
        Err(response) => return response,
    };
    if payload.quantity == 0 {
        return failure(StatusCode::BAD_REQUEST, "quantity must be at least 1");
    }

    let Some(mut cart_items) = state.carts.get_mut(&token) else {
        return failure(StatusCode::NOT_FOUND, format!("cart item {item_id} not found"));
    };
    let Some(item) = cart_items.iter_mut().find(|i| i.id == item_id) else {
        return failure(StatusCode::NOT_FOUND, format!("cart item {item_id} not found"));
    };

    let stock = state.product(item.product_id).and_then(|p| p.stock);
    item.quantity = stock.map_or(payload.quantity, |s| payload.quantity.min(s)).max(1);
    debug!(item_id, quantity = item.quantity, "cart update");

    success(serde_json::json!({ "id": item_id, "quantity": item.quantity }))
}

/// Endpoint: DELETE /mall/cart/{itemId}
async fn remove_cart_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(item_id): Path<i64>,
) -> Response {
    let token = match session_token(&headers) {
        Ok(token) => token,
        Err(response) => return response,
    };

    let removed = state
        .carts
        .get_mut(&token)
        .map(|mut items| {
            let before = items.len();
            items.retain(|i| i.id != item_id);
            items.len() != before
        })
        .unwrap_or(false);

    if removed {
        info!(item_id, "cart remove");
        success(serde_json::json!({ "id": item_id }))
    } else {
        failure(StatusCode::NOT_FOUND, format!("cart item {item_id} not found"))
    }
}
