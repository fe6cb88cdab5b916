//! Composition root.
//!
//! Built once at startup and handed to consumers; every manager receives the
//! same backend handle instead of reaching for a global.

use crate::{
    api::{HttpMallBackend, SessionToken, SharedBackend},
    cart::CartManager,
    catalog::CatalogManager,
    config::Settings,
    error::MallError,
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct MallClient {
    session: SessionToken,
    backend: SharedBackend,
    cart: CartManager,
    catalog: CatalogManager,
}

impl MallClient {
    /// Wires managers around an existing backend.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime (the catalog spawns its
    /// debounce task).
    pub fn new(backend: SharedBackend, session: SessionToken, settings: &Settings) -> Self {
        let cart = CartManager::new(backend.clone(), settings.max_line_quantity);
        let catalog = CatalogManager::new(
            backend.clone(),
            settings.page_size,
            settings.search_debounce(),
        );
        Self {
            session,
            backend,
            cart,
            catalog,
        }
    }

    /// Builds the HTTP backend described by `settings` and wires the managers.
    pub fn connect(settings: &Settings) -> Result<Self, MallError> {
        let session = SessionToken::new(settings.token.clone());
        let backend = HttpMallBackend::new(
            &settings.base_url,
            settings.request_timeout(),
            session.clone(),
        )?;
        info!(base_url = %settings.base_url, "mall client ready");
        Ok(Self::new(Arc::new(backend), session, settings))
    }

    pub fn session(&self) -> &SessionToken {
        &self.session
    }

    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    pub fn cart(&self) -> &CartManager {
        &self.cart
    }

    pub fn catalog(&self) -> &CatalogManager {
        &self.catalog
    }
}
