//! Session token handle.
//!
//! Persisted session storage is owned by the host application; it writes the
//! current token here and the HTTP client reads it per request.

use std::sync::{Arc, PoisonError, RwLock};

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, Default)]
pub struct SessionToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SessionToken {
    pub fn new(token: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(token)),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn get(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Value for the `Authorization` header, if a token is present.
    pub fn authorization(&self) -> Option<String> {
        self.get()
            .filter(|token| !token.trim().is_empty())
            .map(|token| bearer(&token))
    }
}

/// Prefixes `token` with `Bearer ` unless it already carries the prefix.
pub fn bearer(token: &str) -> String {
    let token = token.trim();
    if token.starts_with(BEARER_PREFIX) {
        token.to_string()
    } else {
        format!("{BEARER_PREFIX}{token}")
    }
}

/// Extracts the raw token from an `Authorization` header value.
pub fn strip_bearer(header: &str) -> Option<&str> {
    header
        .trim()
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
