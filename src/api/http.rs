//! Reqwest-backed [`MallBackend`].
//!
//! Owns transport details only: URL building, auth header, timeout, HTTP
//! status mapping, and envelope decoding.

use super::{
    auth::SessionToken,
    endpoint::{Endpoint, ProductQuery},
    models::{ApiEnvelope, CartItem, Product, ProductCategory, ProductListData},
    MallBackend, ProductPage,
};
use crate::error::MallError;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct HttpMallBackend {
    client: Client,
    base_url: String,
    session: SessionToken,
}

impl HttpMallBackend {
    /// Builds a client rooted at `base_url` (e.g. `http://localhost:8080/api`).
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unparsable base URL and a network
    /// error when the reqwest client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration, session: SessionToken) -> Result<Self, MallError> {
        Url::parse(base_url)
            .map_err(|e| MallError::validation(format!("invalid base url {base_url}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionToken {
        &self.session
    }

    fn url(&self, endpoint: &Endpoint) -> Result<Url, MallError> {
        let raw = format!("{}{}", self.base_url, endpoint.path());
        Url::parse(&raw).map_err(|e| MallError::validation(format!("invalid url {raw}: {e}")))
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<ApiEnvelope<T>, MallError> {
        let request_id = Uuid::new_v4();
        let method = endpoint.method();
        let mut request = self
            .client
            .request(method.clone(), self.url(&endpoint)?)
            .header(header::ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id.to_string());

        let query = endpoint.query();
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = endpoint.body() {
            request = request.json(&body);
        }
        if let Some(authorization) = self.session.authorization() {
            request = request.header(header::AUTHORIZATION, authorization);
        }

        debug!(%request_id, %method, path = %endpoint.path(), "sending request");
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(%request_id, %status, bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref())
            .map_err(|e| MallError::decode(format!("invalid response envelope: {e}")))
    }

    async fn send_ack(&self, endpoint: Endpoint) -> Result<(), MallError> {
        self.send::<IgnoredAny>(endpoint).await?.into_data().map(|_| ())
    }
}

#[async_trait]
impl MallBackend for HttpMallBackend {
    async fn categories(&self) -> Result<Vec<ProductCategory>, MallError> {
        self.send(Endpoint::Categories).await?.into_data()
    }

    async fn products(&self, query: &ProductQuery) -> Result<ProductPage, MallError> {
        let envelope: ApiEnvelope<ProductListData> =
            self.send(Endpoint::Products(query.clone())).await?;
        let top_level = envelope.pagination;
        let data = envelope.into_data()?;

        let products = data.products.unwrap_or_else(|| {
            warn!(page = query.page, "product list response has no products field");
            Vec::new()
        });
        Ok(ProductPage {
            products,
            pagination: data.pagination.or(top_level),
        })
    }

    async fn product(&self, id: i64) -> Result<Product, MallError> {
        self.send(Endpoint::ProductDetail(id)).await?.into_data()
    }

    async fn cart_items(&self) -> Result<Vec<CartItem>, MallError> {
        self.send(Endpoint::Cart).await?.into_data()
    }

    async fn add_to_cart(&self, product_id: i64, quantity: u32) -> Result<(), MallError> {
        self.send_ack(Endpoint::AddToCart {
            product_id,
            quantity,
        })
        .await
    }

    async fn update_cart_item(&self, item_id: i64, quantity: u32) -> Result<(), MallError> {
        self.send_ack(Endpoint::UpdateCartItem { item_id, quantity })
            .await
    }

    async fn remove_cart_item(&self, item_id: i64) -> Result<(), MallError> {
        self.send_ack(Endpoint::RemoveCartItem(item_id)).await
    }
}

fn map_transport_error(error: reqwest::Error) -> MallError {
    if error.is_timeout() {
        MallError::Network("request timed out".to_string())
    } else {
        MallError::Network(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MallError {
    match serde_json::from_slice::<ApiEnvelope<IgnoredAny>>(body) {
        Ok(envelope) if !envelope.message.is_empty() => MallError::api(envelope.code, envelope.message),
        _ => MallError::api(
            i64::from(status.as_u16()),
            status.canonical_reason().unwrap_or("request failed"),
        ),
    }
}
