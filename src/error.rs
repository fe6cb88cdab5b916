//! Error taxonomy shared by the REST client and the state managers.

use thiserror::Error;

/// Every failure the storefront core can surface.
///
/// Transport errors are captured as text so the whole enum stays `Clone`
/// and can be fanned out to several observers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MallError {
    /// Transport-level failure (connection refused, timeout, TLS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-200 application code or HTTP status.
    #[error("{message} (code {code})")]
    Api { code: i64, message: String },

    /// A client-side precondition did not hold.
    #[error("{0}")]
    Validation(String),

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl MallError {
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

pub type MallResult<T> = Result<T, MallError>;
