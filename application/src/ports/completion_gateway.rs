//! Completion gateway port
//!
//! Defines the single-shot interface for talking to a chat-completion
//! provider. Adapters (HTTP clients, test doubles) live outside this crate.

use crate::config::SamplingParams;
use async_trait::async_trait;
use relay_domain::{CompletionResponse, Message};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during a completion call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Timeout")]
    Timeout,

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Other error: {0}")]
    Other(String),
}

const TRANSIENT_STATUSES: [u16; 4] = [429, 502, 503, 504];

const TRANSIENT_MARKERS: [&str; 8] = [
    "rate limit",
    "resource exhausted",
    "timeout",
    "timed out",
    "unavailable",
    "429",
    "502",
    "503",
];

impl GatewayError {
    /// Whether retrying the same request may succeed.
    ///
    /// Rate limits, timeouts and temporary unavailability are transient.
    /// Free-form errors are classified by their message.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::RateLimited(_) | GatewayError::Timeout | GatewayError::Unavailable(_) => {
                true
            }
            GatewayError::Http { status, message } => {
                TRANSIENT_STATUSES.contains(status) || mentions_transient(message)
            }
            GatewayError::ConnectionError(msg)
            | GatewayError::RequestFailed(msg)
            | GatewayError::Other(msg) => mentions_transient(msg),
            GatewayError::InvalidResponse(_) => false,
        }
    }
}

fn mentions_transient(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|m| lower.contains(m))
}

/// One chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    /// Tool catalog in function-calling format; `None` disables tools
    pub tools: Option<Vec<Value>>,
    pub sampling: SamplingParams,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>, sampling: SamplingParams) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            sampling,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn has_tools(&self) -> bool {
        self.tools.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// Gateway for chat completions
///
/// This port defines how the application layer reaches a model provider.
/// Each call is independent; conversation state travels in the request.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, request: &CompletionRequest)
    -> Result<CompletionResponse, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_transience() {
        assert!(GatewayError::RateLimited("quota".into()).is_transient());
        assert!(GatewayError::Timeout.is_transient());
        assert!(GatewayError::Unavailable("down".into()).is_transient());
        assert!(!GatewayError::InvalidResponse("bad json".into()).is_transient());
    }

    #[test]
    fn test_http_status_transience() {
        let err = |status| GatewayError::Http {
            status,
            message: String::new(),
        };
        assert!(err(429).is_transient());
        assert!(err(503).is_transient());
        assert!(err(504).is_transient());
        assert!(!err(400).is_transient());
        assert!(!err(401).is_transient());
    }

    #[test]
    fn test_message_markers() {
        assert!(GatewayError::Other("Resource exhausted for project".into()).is_transient());
        assert!(GatewayError::RequestFailed("upstream timed out".into()).is_transient());
        assert!(GatewayError::ConnectionError("got 502 from proxy".into()).is_transient());
        assert!(!GatewayError::RequestFailed("invalid api key".into()).is_transient());
    }

    #[test]
    fn test_request_tools() {
        let req = CompletionRequest::new("m", vec![], SamplingParams::default());
        assert!(!req.has_tools());
        assert!(!req.clone().with_tools(vec![]).has_tools());
        assert!(req.with_tools(vec![serde_json::json!({})]).has_tools());
    }
}
