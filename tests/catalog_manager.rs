//! Integration tests for the catalog listing manager
//!
//! These tests drive `CatalogManager` against a scripted backend and cover:
//! - Initial load of categories and page 1
//! - End-of-data detection and pagination
//! - Cursor rollback after a failed page
//! - Category switching and debounced keyword search
//! - Discarding responses for an outdated filter

mod common;

use common::{category, product, Call, FakeBackend};
use pet_mall::api::ProductCategory;
use pet_mall::catalog::{
    CatalogManager, FetchOutcome, ProductFilter, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Helper function to build a catalogue of `count` products alternating
/// between categories 1 and 2
fn catalogue(count: i64) -> FakeBackend {
    let products = (1..=count)
        .map(|id| product(id, if id % 2 == 0 { 2 } else { 1 }, 10.0, None))
        .collect();
    FakeBackend::with_catalogue(
        vec![category(1, "Dog Food"), category(2, "Cat Supplies")],
        products,
    )
}

fn manager(fake: &Arc<FakeBackend>) -> CatalogManager {
    CatalogManager::new(fake.clone(), DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE)
}

fn is_products(call: &Call) -> bool {
    matches!(call, Call::Products(_))
}

fn ids(catalog: &CatalogManager) -> Vec<i64> {
    catalog.products().iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn test_load_initial_prepends_all_category() {
    let fake = Arc::new(catalogue(10));
    let catalog = manager(&fake);

    let outcome = catalog.load_initial().await;

    assert_eq!(outcome, (FetchOutcome::Loaded, FetchOutcome::Loaded));
    let categories = catalog.categories();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[0].id, ProductCategory::ALL_ID);
    assert_eq!(categories[0].name, "All");
    assert_eq!(catalog.products().len(), 10);
    assert!(catalog.has_more());
    assert!(!catalog.is_loading());
}

#[tokio::test]
async fn test_short_page_ends_pagination() {
    let fake = Arc::new(catalogue(3));
    let catalog = manager(&fake);

    catalog.load_initial().await;
    assert_eq!(catalog.products().len(), 3);
    assert!(!catalog.has_more());

    assert_eq!(catalog.load_more().await, FetchOutcome::Skipped);
    assert_eq!(fake.count(is_products), 1);
}

#[tokio::test]
async fn test_load_more_follows_server_pagination() {
    let fake = Arc::new(catalogue(25));
    FakeBackend::set(&fake.with_pagination, true);
    let catalog = manager(&fake);

    catalog.load_initial().await;
    assert_eq!(catalog.load_more().await, FetchOutcome::Loaded);
    assert!(catalog.has_more());
    assert_eq!(catalog.load_more().await, FetchOutcome::Loaded);

    assert_eq!(ids(&catalog), (1..=25).collect::<Vec<_>>());
    assert_eq!(catalog.page(), 3);
    assert!(!catalog.has_more());
    assert_eq!(catalog.load_more().await, FetchOutcome::Skipped);
}

#[tokio::test]
async fn test_failed_load_more_retries_same_page() {
    let fake = Arc::new(catalogue(25));
    let catalog = manager(&fake);
    let mut notices = catalog.subscribe_notices();

    catalog.load_initial().await;
    FakeBackend::set(&fake.fail_products, true);

    assert_eq!(catalog.load_more().await, FetchOutcome::Failed);
    assert_eq!(catalog.page(), 1);
    assert_eq!(catalog.products().len(), 10);
    assert!(catalog.has_more());
    let notice = notices.recv().await.unwrap();
    assert!(notice.message.starts_with("Failed to load products"));

    FakeBackend::set(&fake.fail_products, false);
    assert_eq!(catalog.load_more().await, FetchOutcome::Loaded);

    let pages: Vec<u32> = fake.product_queries().iter().map(|q| q.page).collect();
    assert_eq!(pages, vec![1, 2, 2]);
    assert_eq!(catalog.products().len(), 20);
}

#[tokio::test]
async fn test_category_failure_does_not_block_products() {
    let fake = Arc::new(catalogue(10));
    FakeBackend::set(&fake.fail_categories, true);
    let catalog = manager(&fake);
    let mut notices = catalog.subscribe_notices();

    let outcome = catalog.load_initial().await;

    assert_eq!(outcome, (FetchOutcome::Failed, FetchOutcome::Loaded));
    assert!(catalog.categories().is_empty());
    assert_eq!(catalog.products().len(), 10);
    let notice = notices.recv().await.unwrap();
    assert!(notice.message.starts_with("Failed to load categories"));
}

#[tokio::test]
async fn test_product_failure_does_not_block_categories() {
    let fake = Arc::new(catalogue(10));
    FakeBackend::set(&fake.fail_products, true);
    let catalog = manager(&fake);

    let outcome = catalog.load_initial().await;

    assert_eq!(outcome, (FetchOutcome::Loaded, FetchOutcome::Failed));
    assert_eq!(catalog.categories().len(), 3);
    assert!(catalog.products().is_empty());
}

#[tokio::test]
async fn test_set_category_resets_listing() {
    let fake = Arc::new(catalogue(25));
    let catalog = manager(&fake);
    catalog.load_initial().await;
    catalog.load_more().await;

    assert_eq!(catalog.set_category(Some(2)).await, FetchOutcome::Loaded);
    assert_eq!(catalog.page(), 1);
    assert_eq!(catalog.filter().category_id, Some(2));
    assert!(catalog.products().iter().all(|p| p.category_id == 2));
    assert_eq!(catalog.products().len(), 10);

    catalog.set_category(Some(ProductCategory::ALL_ID)).await;
    assert_eq!(catalog.filter().category_id, None);
    assert_eq!(fake.product_queries().last().unwrap().category_id, None);
}

#[tokio::test]
async fn test_refresh_keeps_filter_and_resets_cursor() {
    let fake = Arc::new(catalogue(25));
    let catalog = manager(&fake);
    catalog.load_initial().await;
    catalog.set_category(Some(1)).await;
    catalog.load_more().await;
    assert_eq!(catalog.page(), 2);

    let outcome = catalog.refresh().await;

    assert_eq!(outcome, (FetchOutcome::Loaded, FetchOutcome::Loaded));
    assert_eq!(catalog.page(), 1);
    assert_eq!(catalog.filter().category_id, Some(1));
    assert_eq!(catalog.products().len(), 10);
    assert_eq!(fake.count(|c| *c == Call::Categories), 2);
}

#[tokio::test]
async fn test_load_filtered_fetches_one_filtered_page() {
    let fake = Arc::new(catalogue(25));
    let catalog = manager(&fake);

    let outcome = catalog
        .load_filtered(ProductFilter {
            category_id: Some(2),
            keyword: Some(" product 2 ".to_string()),
        })
        .await;

    assert_eq!(outcome, (FetchOutcome::Loaded, FetchOutcome::Loaded));
    let queries = fake.product_queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].category_id, Some(2));
    assert_eq!(queries[0].keyword.as_deref(), Some("product 2"));
    assert_eq!(ids(&catalog), vec![2, 20, 22, 24]);
    assert_eq!(catalog.categories().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_keyword_burst_issues_one_fetch() {
    let fake = Arc::new(catalogue(25));
    let catalog = manager(&fake);

    for keyword in ["p", "pr", "pro", "prod", "product 2"] {
        catalog.set_search_keyword(Some(keyword.to_string()));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(fake.count(is_products), 0);

    tokio::time::sleep(Duration::from_millis(600)).await;

    let queries = fake.product_queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].keyword.as_deref(), Some("product 2"));
    assert_eq!(queries[0].page, 1);
    assert_eq!(catalog.filter().keyword.as_deref(), Some("product 2"));
    assert_eq!(ids(&catalog), vec![2, 20, 21, 22, 23, 24, 25]);
}

#[tokio::test]
async fn test_blank_search_clears_keyword() {
    let fake = Arc::new(catalogue(5));
    let catalog = manager(&fake);

    catalog.search(Some("product 3".to_string())).await;
    assert_eq!(ids(&catalog), vec![3]);

    catalog.search(Some("   ".to_string())).await;
    assert_eq!(catalog.filter().keyword, None);
    assert_eq!(catalog.products().len(), 5);
}

#[tokio::test]
async fn test_outdated_page_is_discarded() {
    let fake = Arc::new(catalogue(25));
    let catalog = manager(&fake);
    let (release, gate) = oneshot::channel();
    fake.gate_products(vec![gate]);

    let initial = tokio::spawn({
        let catalog = catalog.clone();
        async move { catalog.load_initial().await }
    });
    fake.wait_for(1, is_products).await;

    assert_eq!(catalog.set_category(Some(2)).await, FetchOutcome::Loaded);
    release.send(()).unwrap();

    let (_, page) = initial.await.unwrap();
    assert_eq!(page, FetchOutcome::Stale);
    assert!(catalog.products().iter().all(|p| p.category_id == 2));
    assert!(!catalog.is_loading());
}

#[tokio::test]
async fn test_load_more_skipped_while_page_in_flight() {
    let fake = Arc::new(catalogue(25));
    let catalog = manager(&fake);
    let (release, gate) = oneshot::channel();
    fake.gate_products(vec![gate]);

    let initial = tokio::spawn({
        let catalog = catalog.clone();
        async move { catalog.load_initial().await }
    });
    fake.wait_for(1, is_products).await;
    assert!(catalog.is_loading());

    assert_eq!(catalog.load_more().await, FetchOutcome::Skipped);

    release.send(()).unwrap();
    assert_eq!(initial.await.unwrap().1, FetchOutcome::Loaded);
    assert_eq!(fake.count(is_products), 1);
    assert_eq!(catalog.page(), 1);
}

#[tokio::test]
async fn test_product_detail_failure_publishes_notice() {
    let fake = Arc::new(catalogue(3));
    let catalog = manager(&fake);
    let mut notices = catalog.subscribe_notices();

    assert_eq!(catalog.product(2).await.map(|p| p.id), Some(2));

    FakeBackend::set(&fake.fail_product, true);
    assert!(catalog.product(2).await.is_none());
    let notice = notices.recv().await.unwrap();
    assert!(notice.message.starts_with("Failed to load product"));
}
