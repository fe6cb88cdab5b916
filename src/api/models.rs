//! Wire models for the mall REST contract.
//!
//! Field names follow the backend: camelCase everywhere except the
//! pagination block, which uses snake_case keys.

use crate::error::MallError;
use serde::{Deserialize, Serialize};

// =============================================================================
// Envelope
// =============================================================================

/// Application status code the backend uses for success.
pub const CODE_OK: i64 = 200;

/// Generic response envelope `{code, message, data, pagination?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,

    #[serde(default)]
    pub message: String,

    #[serde(default = "Option::default")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, treating a non-200 code or a null `data` as a
    /// failure carrying the backend message.
    pub fn into_data(self) -> Result<T, MallError> {
        if self.code != CODE_OK {
            return Err(MallError::api(self.code, self.message));
        }
        match self.data {
            Some(data) => Ok(data),
            None if self.message.is_empty() => Err(MallError::api(self.code, "no data returned")),
            None => Err(MallError::api(self.code, self.message)),
        }
    }
}

/// Server-side pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_page: u32,
    pub current_page: u32,
    pub page_pieces: u32,
    pub total_pieces: u64,
}

impl Pagination {
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_page
    }
}

// =============================================================================
// Catalogue
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub sort: Option<i32>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
}

impl ProductCategory {
    /// Id of the synthetic "All" entry shown before the fetched categories.
    pub const ALL_ID: i64 = 0;

    pub fn all() -> Self {
        Self {
            id: Self::ALL_ID,
            name: "All".to_string(),
            parent_id: None,
            level: None,
            sort: Some(0),
            icon: Some("square.grid.2x2".to_string()),
            status: Some(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    #[serde(default)]
    pub brand: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub sales: Option<u32>,
    #[serde(default)]
    pub main_image: Option<String>,
    /// Comma separated list of image URLs.
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

impl Product {
    pub fn has_discount(&self) -> bool {
        self.original_price
            .is_some_and(|original| original > self.price)
    }

    /// Whole percent off the original price, truncated.
    pub fn discount_percentage(&self) -> Option<u32> {
        let original = self.original_price.filter(|o| *o > 0.0)?;
        if !self.has_discount() {
            return None;
        }
        Some(((1.0 - self.price / original) * 100.0) as u32)
    }

    pub fn album_images(&self) -> Vec<String> {
        self.album
            .as_deref()
            .map(|album| {
                album
                    .split(',')
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// `data` block of the product list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductListData {
    #[serde(default)]
    pub products: Option<Vec<Product>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

// =============================================================================
// Cart
// =============================================================================

/// A cart entry as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub product_id: i64,
    pub quantity: u32,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub product: Option<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartBody {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuantityBody {
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(price: f64, original_price: Option<f64>) -> Product {
        serde_json::from_value(json!({
            "id": 1,
            "name": "Adult dog food 2.5kg",
            "categoryId": 1,
            "price": price,
            "originalPrice": original_price,
        }))
        .unwrap()
    }

    #[test]
    fn envelope_with_non_200_code_is_an_api_error() {
        let envelope: ApiEnvelope<Vec<ProductCategory>> =
            serde_json::from_value(json!({"code": 500, "message": "boom", "data": []})).unwrap();
        assert_eq!(envelope.into_data(), Err(MallError::api(500, "boom")));
    }

    #[test]
    fn envelope_with_null_data_is_an_api_error() {
        let envelope: ApiEnvelope<Product> =
            serde_json::from_value(json!({"code": 200, "message": "", "data": null})).unwrap();
        assert_eq!(
            envelope.into_data(),
            Err(MallError::api(200, "no data returned"))
        );
    }

    #[test]
    fn pagination_uses_snake_case_keys() {
        let envelope: ApiEnvelope<ProductListData> = serde_json::from_value(json!({
            "code": 200,
            "message": "ok",
            "data": {"products": []},
            "pagination": {"total_page": 3, "current_page": 1, "page_pieces": 10, "total_pieces": 25}
        }))
        .unwrap();
        let pagination = envelope.pagination.unwrap();
        assert!(pagination.has_more());
        assert_eq!(pagination.total_pieces, 25);
    }

    #[test]
    fn discount_helpers_follow_original_price() {
        let discounted = product(89.0, Some(129.0));
        assert!(discounted.has_discount());
        assert_eq!(discounted.discount_percentage(), Some(31));

        let plain = product(25.0, None);
        assert!(!plain.has_discount());
        assert_eq!(plain.discount_percentage(), None);

        let marked_up = product(30.0, Some(20.0));
        assert_eq!(marked_up.discount_percentage(), None);
    }

    #[test]
    fn album_splits_on_commas_and_drops_blanks() {
        let mut p = product(10.0, None);
        p.album = Some("a.png, b.png,,".to_string());
        assert_eq!(p.album_images(), vec!["a.png", "b.png"]);
    }
}
