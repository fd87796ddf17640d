use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// ApiError
///
/// Every failure a backend call can surface. Domain clients never catch these; the
/// caller decides what the user sees.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (offline, DNS, refused, TLS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http {
        status: StatusCode,
        message: String,
        body: Value,
    },

    /// A success body that does not have the shape the caller asked for.
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The configured base URL and the request path do not form a valid URL.
    #[error("invalid request url `{0}`")]
    InvalidUrl(String),
}

impl ApiError {
    /// The HTTP status for `Http` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }

    /// The parsed response body for `Http` errors.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}
