//! Catalog Listing Module
//!
//! Paginated, filterable product listing:
//! - Listing models (CatalogPage, ProductFilter)
//! - Keyword debouncing
//! - State management (CatalogManager)

pub mod debounce;
pub mod models;
pub mod state;

pub use models::{CatalogPage, ProductFilter, DEFAULT_PAGE_SIZE};
pub use state::{CatalogManager, FetchOutcome, DEFAULT_SEARCH_DEBOUNCE};
