use reqwest::{
    Method, StatusCode, Url,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;

use crate::{config::AppConfig, error::ApiError, session::SessionState};

/// ApiClient
///
/// The one place HTTP happens. Every domain client funnels through `request` (or `send`, for URLs built by
/// `endpoint`), which
/// applies the shared conventions:
///
/// - JSON request bodies, and no body at all for bodyless calls.
/// - `Content-Type: application/json` always; `Authorization: Bearer <token>` whenever
///   the session holds a token at call time.
/// - Response text is read once: empty means `null`, valid JSON is parsed, anything
///   else is kept as a raw JSON string.
/// - Non-2xx statuses become `ApiError::Http` with a message taken from the body's
///   `error` or `message` field, a raw-text body, or the status line, in that order.
/// - Success returns the parsed body decoded into the caller's type.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionState>,
}

impl ApiClient {
    /// Builds a client for `config.api_base_url` that authenticates with `session`.
    pub fn new(config: &AppConfig, session: Arc<SessionState>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// DELETE, optionally with a JSON body (the agent removal endpoint expects one).
    pub async fn delete<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::DELETE, path, body).await
    }

    /// request
    ///
    /// Issues one call and applies the body/error conventions described on the type.
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        self.send(method, url, body).await
    }

    /// endpoint
    ///
    /// Builds `prefix/<segment>` for a caller-supplied identifier. The identifier is
    /// percent-encoded as exactly one path segment, so `?`, `#` and `/` cannot turn
    /// it into a query, a fragment or a different endpoint. Empty, `.` and `..`
    /// identifiers are rejected.
    pub fn endpoint(&self, prefix: &str, segment: &str) -> Result<Url, ApiError> {
        let mut url = self.url(prefix)?;
        if matches!(segment, "" | "." | "..") {
            return Err(ApiError::InvalidUrl(format!("{url}/{segment}")));
        }
        let base = url.to_string();
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments.pop_if_empty().push(segment);
            }
            Err(()) => return Err(ApiError::InvalidUrl(base)),
        }
        Ok(url)
    }

    /// Same as `request`, for a URL already built with `endpoint`.
    pub async fn send<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(%method, %url, "api request");

        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.token() {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "api request failed to send");
            ApiError::Network(e)
        })?;

        let status = response.status();
        let text = response.text().await?;
        let value = parse_body(&text);

        if !status.is_success() {
            let message = error_message(status, &value);
            tracing::warn!(%method, %url, status = status.as_u16(), %message, "api request rejected");
            return Err(ApiError::Http {
                status,
                message,
                body: value,
            });
        }

        serde_json::from_value(value).map_err(ApiError::Decode)
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        Url::parse(&joined).map_err(|_| ApiError::InvalidUrl(joined))
    }
}

/// Response body policy: empty is `null`, JSON is parsed, anything else stays raw text.
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Picks the human-readable message for a rejected call.
pub fn error_message(status: StatusCode, body: &Value) -> String {
    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    field("error")
        .or_else(|| field("message"))
        .or_else(|| body.as_str().map(str::trim).filter(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| status_line(status))
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}
