//! Error types for talking to the upstream statistics API.
//!
//! Stale responses are not represented here: a result for a superseded
//! selection is a normal outcome of the dashboard reducer, see
//! [`crate::dashboard::Applied::Stale`].

use thiserror::Error;

/// Failure while fetching or decoding one upstream response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, timeout, reset…).
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-2xx status.
    #[error("request to {url} returned HTTP {status}{}", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        url: String,
        status: u16,
        /// The API's own `message` field, when the error body carried one.
        message: Option<String>,
    },
    /// The body was not the shape we expected.
    #[error("malformed response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: DecodeError,
    },
}

impl FetchError {
    /// Short text suitable for a one-line UI notice.
    pub fn notice(&self) -> String {
        match self {
            FetchError::Network { .. } => format!("Network error: {self}"),
            FetchError::Status { status, message, .. } => match message {
                Some(m) => format!("Upstream error ({status}): {m}"),
                None => format!("Upstream error ({status})"),
            },
            FetchError::Malformed { source, .. } => format!("Unexpected data: {source}"),
        }
    }
}

/// Boundary validation failure for a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    Json(String),
    #[error("missing field `{field}` in {context}")]
    MissingField {
        field: &'static str,
        context: String,
    },
    #[error("unparseable timeline date `{0}`")]
    Date(String),
}

impl DecodeError {
    pub(crate) fn missing(field: &'static str, context: impl Into<String>) -> Self {
        DecodeError::MissingField {
            field,
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Json(e.to_string())
    }
}
