use form_spec::Link;
use serde_json::Value;
use thiserror::Error;

/// Failure reported by a transport collaborator.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {reason}")]
    Failed { url: String, reason: String },
}

impl TransportError {
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        TransportError::Failed {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Fetches schema documents by URL. The controller treats any error as a
/// load failure; the body is parsed into a schema afterwards.
pub trait SchemaTransport {
    fn fetch_schema(&self, url: &str) -> Result<Value, TransportError>;
}

/// Delivers extracted form data to a link's endpoint. The link's method
/// defaults to POST and its enctype to `application/json`.
pub trait SubmissionTransport {
    fn submit(&self, link: &Link, payload: &Value) -> Result<Value, TransportError>;
}
