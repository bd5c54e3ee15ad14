use std::fmt;

use async_trait::async_trait;

/// Errors that can occur while talking to a remote service.
/// Nothing here is retried; the caller shows the message and moves on.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Service misconfigured (missing API key, bad URL). No request was made.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned a non-success status.
    Api { status: u16, message: String },
    /// Response body did not have the expected shape.
    Parse(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Config(msg) => write!(f, "config error: {msg}"),
            ServiceError::Network(msg) => write!(f, "network error: {msg}"),
            ServiceError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ServiceError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter
        let e = e.without_url();
        if e.is_decode() {
            ServiceError::Parse(e.to_string())
        } else {
            ServiceError::Network(e.to_string())
        }
    }
}

/// A one-line dashboard feed (weather, news).
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Fetch the current one-line summary.
    async fn fetch(&self) -> Result<String, ServiceError>;

    /// Text shown when the fetch fails.
    fn fallback(&self) -> String;

    /// Fetch, folding any error into the fallback line.
    async fn summary(&self) -> String {
        match self.fetch().await {
            Ok(line) => line,
            Err(e) => {
                log::warn!("{} feed failed: {}", self.name(), e);
                format!("{} ({})", self.fallback(), e)
            }
        }
    }
}

/// Reads a non-success response into `ServiceError::Api`.
pub(crate) async fn api_error(response: reqwest::Response) -> ServiceError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    ServiceError::Api { status, message }
}
