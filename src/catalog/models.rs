//! Catalog listing models.

use crate::api::models::{Pagination, Product, ProductCategory};

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One fetched page with its end-of-data verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<Product>,
    pub page_number: u32,
    pub page_size: u32,
    pub has_more: bool,
}

impl CatalogPage {
    /// Server metadata wins when present; otherwise a full page is taken to
    /// mean more data may follow.
    pub fn new(
        items: Vec<Product>,
        page_number: u32,
        page_size: u32,
        pagination: Option<&Pagination>,
    ) -> Self {
        let has_more = match pagination {
            Some(pagination) => pagination.has_more(),
            None => items.len() >= page_size as usize,
        };
        Self {
            items,
            page_number,
            page_size,
            has_more,
        }
    }
}

/// Current listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub keyword: Option<String>,
}

/// Treats the synthetic "All" category as no filter.
pub fn normalize_category(category_id: Option<i64>) -> Option<i64> {
    category_id.filter(|id| *id != ProductCategory::ALL_ID)
}

/// Blank keywords mean no keyword.
pub fn normalize_keyword(keyword: Option<String>) -> Option<String> {
    keyword
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

/// Prepends the "All" entry to the fetched categories.
pub fn with_all_category(categories: Vec<ProductCategory>) -> Vec<ProductCategory> {
    std::iter::once(ProductCategory::all())
        .chain(
            categories
                .into_iter()
                .filter(|c| c.id != ProductCategory::ALL_ID),
        )
        .collect()
}
