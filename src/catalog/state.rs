//! Catalog Listing State Management
//!
//! [`CatalogManager`] holds the category list, the current filter, the page
//! cursor and the accumulated product list, and publishes each of them to
//! observers.

use super::{
    debounce::Debouncer,
    models::{normalize_category, normalize_keyword, with_all_category, CatalogPage, ProductFilter},
};
use crate::{
    api::{Product, ProductCategory, ProductPage, ProductQuery, SharedBackend},
    error::MallError,
    notice::{Notice, NoticeSender},
};
use futures_util::future::join;
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

/// Default quiet period before a keyword change triggers a fetch.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Result of one fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded,
    /// Not issued: a fetch is already in flight or there is no more data.
    Skipped,
    Failed,
    /// Completed after the filter changed; the result was discarded.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    Replace,
    Append,
}

struct PageRequest {
    query: ProductQuery,
    epoch: u64,
    mode: FetchMode,
}

#[derive(Default)]
struct ListingState {
    filter: ProductFilter,
    page: u32,
    /// Bumped on every reset; product responses tagged with an older epoch
    /// are dropped.
    epoch: u64,
    products: Vec<Product>,
    has_more: bool,
    pages_in_flight: u32,
    categories_in_flight: u32,
}

/// Cheap, cloneable handle to the catalog listing.
#[derive(Clone)]
pub struct CatalogManager {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    backend: SharedBackend,
    page_size: u32,
    state: Mutex<ListingState>,

    categories_tx: watch::Sender<Vec<ProductCategory>>,
    products_tx: watch::Sender<Vec<Product>>,
    has_more_tx: watch::Sender<bool>,
    loading_tx: watch::Sender<bool>,
    filter_tx: watch::Sender<ProductFilter>,
    notices: NoticeSender,

    keyword_debouncer: Debouncer<Option<String>>,
}

impl CatalogManager {
    /// Creates the manager and its keyword debounce task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(backend: SharedBackend, page_size: u32, search_debounce: Duration) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<CatalogInner>| {
            let weak = weak.clone();
            let keyword_debouncer = Debouncer::spawn(search_debounce, move |keyword: Option<String>| {
                let weak = weak.clone();
                async move {
                    // The manager may have been dropped while the timer ran.
                    if let Some(inner) = weak.upgrade() {
                        CatalogManager { inner }.apply_keyword(keyword).await;
                    }
                }
            });

            CatalogInner {
                backend,
                page_size: page_size.max(1),
                state: Mutex::new(ListingState {
                    page: 1,
                    has_more: true,
                    ..ListingState::default()
                }),
                categories_tx: watch::channel(Vec::new()).0,
                products_tx: watch::channel(Vec::new()).0,
                has_more_tx: watch::channel(true).0,
                loading_tx: watch::channel(false).0,
                filter_tx: watch::channel(ProductFilter::default()).0,
                notices: NoticeSender::new(),
                keyword_debouncer,
            }
        });
        Self { inner }
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    pub fn categories(&self) -> Vec<ProductCategory> {
        self.inner.categories_tx.borrow().clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.inner.products_tx.borrow().clone()
    }

    pub fn has_more(&self) -> bool {
        *self.inner.has_more_tx.borrow()
    }

    pub fn is_loading(&self) -> bool {
        *self.inner.loading_tx.borrow()
    }

    pub fn filter(&self) -> ProductFilter {
        self.inner.filter_tx.borrow().clone()
    }

    /// Page the cursor currently points at.
    pub fn page(&self) -> u32 {
        self.inner.lock_state().page
    }

    pub fn subscribe_categories(&self) -> watch::Receiver<Vec<ProductCategory>> {
        self.inner.categories_tx.subscribe()
    }

    pub fn subscribe_products(&self) -> watch::Receiver<Vec<Product>> {
        self.inner.products_tx.subscribe()
    }

    pub fn subscribe_has_more(&self) -> watch::Receiver<bool> {
        self.inner.has_more_tx.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.inner.loading_tx.subscribe()
    }

    pub fn subscribe_filter(&self) -> watch::Receiver<ProductFilter> {
        self.inner.filter_tx.subscribe()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Fetches categories and the first page concurrently. Either may fail
    /// without affecting the other.
    pub async fn load_initial(&self) -> (FetchOutcome, FetchOutcome) {
        let request = self.inner.restart(|_| {});
        join(self.fetch_categories(), self.fetch_page(request)).await
    }

    /// Like [`load_initial`](Self::load_initial), but installs `filter`
    /// before the first page is requested so only the filtered page is
    /// fetched.
    pub async fn load_filtered(&self, filter: ProductFilter) -> (FetchOutcome, FetchOutcome) {
        let category_id = normalize_category(filter.category_id);
        let keyword = normalize_keyword(filter.keyword);
        let request = self.inner.restart(|current| {
            current.category_id = category_id;
            current.keyword = keyword;
        });
        join(self.fetch_categories(), self.fetch_page(request)).await
    }

    /// Resets pagination and re-fetches categories and page 1.
    pub async fn refresh(&self) -> (FetchOutcome, FetchOutcome) {
        self.load_initial().await
    }

    /// Switches category (`None` or the "All" id clears it) and fetches page 1.
    pub async fn set_category(&self, category_id: Option<i64>) -> FetchOutcome {
        let category_id = normalize_category(category_id);
        let request = self.inner.restart(|filter| filter.category_id = category_id);
        self.fetch_page(request).await
    }

    /// Schedules a keyword change. Rapid calls collapse into one fetch using
    /// the last keyword once the debounce delay passes without a new call.
    pub fn set_search_keyword(&self, keyword: Option<String>) {
        self.inner.keyword_debouncer.push(keyword);
    }

    /// Fetches the next page and appends it. Skipped while a page fetch is
    /// in flight or when the end of data was reached.
    pub async fn load_more(&self) -> FetchOutcome {
        let Some(request) = self.inner.begin_load_more() else {
            return FetchOutcome::Skipped;
        };
        self.fetch_page(request).await
    }

    /// Fetches one product for a detail view.
    pub async fn product(&self, id: i64) -> Option<Product> {
        match self.inner.backend.product(id).await {
            Ok(product) => Some(product),
            Err(err) => {
                self.inner.notices.failed("Failed to load product", &err);
                None
            }
        }
    }

    /// Applies a keyword immediately, bypassing the debounce (e.g. a submit
    /// button).
    pub async fn search(&self, keyword: Option<String>) -> FetchOutcome {
        self.apply_keyword(keyword).await
    }

    async fn apply_keyword(&self, keyword: Option<String>) -> FetchOutcome {
        let keyword = normalize_keyword(keyword);
        info!(?keyword, "search keyword settled");
        let request = self.inner.restart(|filter| filter.keyword = keyword);
        self.fetch_page(request).await
    }

    async fn fetch_categories(&self) -> FetchOutcome {
        self.inner.with_state(|state| state.categories_in_flight += 1);
        let result = self.inner.backend.categories().await;
        self.inner
            .with_state(|state| state.categories_in_flight = state.categories_in_flight.saturating_sub(1));

        match result {
            Ok(categories) => {
                debug!(count = categories.len(), "categories loaded");
                self.inner.categories_tx.send_replace(with_all_category(categories));
                FetchOutcome::Loaded
            }
            Err(err) => {
                self.inner.notices.failed("Failed to load categories", &err);
                FetchOutcome::Failed
            }
        }
    }

    async fn fetch_page(&self, request: PageRequest) -> FetchOutcome {
        debug!(query = ?request.query, epoch = request.epoch, "fetching products");
        let result = self.inner.backend.products(&request.query).await;
        self.inner.finish_page(&request, result)
    }
}

impl CatalogInner {
    fn lock_state(&self) -> MutexGuard<'_, ListingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `update` under the lock and republishes the loading flag.
    fn with_state(&self, update: impl FnOnce(&mut ListingState)) {
        let mut state = self.lock_state();
        update(&mut state);
        self.publish_loading(&state);
    }

    fn publish_loading(&self, state: &ListingState) {
        self.loading_tx
            .send_replace(state.pages_in_flight + state.categories_in_flight > 0);
    }

    fn publish_listing(&self, state: &ListingState) {
        self.products_tx.send_replace(state.products.clone());
        self.has_more_tx.send_replace(state.has_more);
    }

    /// Applies a filter change and resets the listing to an empty page 1.
    fn restart(&self, update: impl FnOnce(&mut ProductFilter)) -> PageRequest {
        let mut state = self.lock_state();
        update(&mut state.filter);
        state.page = 1;
        state.epoch += 1;
        state.products.clear();
        state.has_more = true;
        state.pages_in_flight += 1;

        self.filter_tx.send_replace(state.filter.clone());
        self.publish_listing(&state);
        self.publish_loading(&state);
        self.request(&state, FetchMode::Replace)
    }

    fn begin_load_more(&self) -> Option<PageRequest> {
        let mut state = self.lock_state();
        if state.pages_in_flight > 0 || !state.has_more {
            debug!(
                in_flight = state.pages_in_flight,
                has_more = state.has_more,
                "load more skipped"
            );
            return None;
        }
        state.page += 1;
        state.pages_in_flight += 1;
        self.publish_loading(&state);
        Some(self.request(&state, FetchMode::Append))
    }

    fn request(&self, state: &ListingState, mode: FetchMode) -> PageRequest {
        PageRequest {
            query: ProductQuery {
                category_id: state.filter.category_id,
                keyword: state.filter.keyword.clone(),
                page: state.page,
                size: self.page_size,
            },
            epoch: state.epoch,
            mode,
        }
    }

    fn finish_page(&self, request: &PageRequest, result: Result<ProductPage, MallError>) -> FetchOutcome {
        let mut state = self.lock_state();
        state.pages_in_flight = state.pages_in_flight.saturating_sub(1);
        self.publish_loading(&state);

        if state.epoch != request.epoch {
            debug!(
                issued = request.epoch,
                current = state.epoch,
                "discarding page for an outdated filter"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(page) => {
                let page = CatalogPage::new(
                    page.products,
                    request.query.page,
                    request.query.size,
                    page.pagination.as_ref(),
                );
                debug!(
                    page = page.page_number,
                    items = page.items.len(),
                    has_more = page.has_more,
                    "products loaded"
                );
                match request.mode {
                    FetchMode::Replace => state.products = page.items,
                    FetchMode::Append => state.products.extend(page.items),
                }
                state.has_more = page.has_more;
                self.publish_listing(&state);
                FetchOutcome::Loaded
            }
            Err(err) => {
                // Step the cursor back so a retry asks for the same page.
                if request.mode == FetchMode::Append && state.page == request.query.page {
                    state.page = state.page.saturating_sub(1).max(1);
                }
                self.notices.failed("Failed to load products", &err);
                FetchOutcome::Failed
            }
        }
    }
}
