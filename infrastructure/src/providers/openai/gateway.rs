//! HTTP gateway for OpenAI-compatible endpoints

use super::types;
use async_trait::async_trait;
use relay_application::ports::completion_gateway::{
    CompletionGateway, CompletionRequest, GatewayError,
};
use relay_domain::CompletionResponse;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection settings for [`OpenAiCompatGateway`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiCompatConfig {
    /// Base URL up to (not including) `/chat/completions`
    pub base_url: String,
    /// Sent as a bearer token when present
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for OpenAiCompatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(120),
        }
    }
}

impl OpenAiCompatConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full endpoint URL.
    pub fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{}/chat/completions", base)
        }
    }
}

/// [`CompletionGateway`] over the Chat Completions JSON protocol.
///
/// Stateless: the full transcript travels with every request.
pub struct OpenAiCompatGateway {
    config: OpenAiCompatConfig,
    client: reqwest::Client,
}

impl OpenAiCompatGateway {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                GatewayError::ConnectionError(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OpenAiCompatConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionGateway for OpenAiCompatGateway {
    #[instrument(skip_all, fields(model = %request.model))]
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, GatewayError> {
        let body = types::build_request(request);
        debug!(
            messages = body.messages.len(),
            tools = body.tools.map_or(0, |t| t.len()),
            "Sending chat completion request"
        );

        let mut http = self.client.post(self.config.completions_url()).json(&body);
        if let Some(key) = &self.config.api_key {
            http = http.bearer_auth(key);
        }

        let response = http
            .send()
            .await
            .map_err(|e| types::convert_transport_error(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| types::convert_transport_error(&e))?;

        if !status.is_success() {
            return Err(types::convert_status(status.as_u16(), &text));
        }

        let parsed: types::ChatResponse = serde_json::from_str(&text).map_err(|e| {
            GatewayError::InvalidResponse(format!("Failed to parse completion response: {}", e))
        })?;

        types::convert_response(parsed)
    }
}
