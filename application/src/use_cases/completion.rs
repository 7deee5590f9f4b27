//! Completion client: request assembly plus retry.

use crate::config::{RetryPolicy, SamplingParams};
use crate::ports::completion_gateway::{CompletionGateway, CompletionRequest, GatewayError};
use crate::use_cases::retry::call_with_retry;
use relay_domain::{CompletionResponse, Message};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Issues completion requests for one model through the retry controller.
#[derive(Clone)]
pub struct CompletionClient {
    gateway: Arc<dyn CompletionGateway>,
    model: String,
    sampling: SamplingParams,
    retry: RetryPolicy,
}

impl CompletionClient {
    pub fn new(gateway: Arc<dyn CompletionGateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
            sampling: SamplingParams::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request(&self, messages: Vec<Message>, tools: Option<Vec<Value>>) -> CompletionRequest {
        let request = CompletionRequest::new(&self.model, messages, self.sampling.clone());
        match tools {
            Some(tools) if !tools.is_empty() => request.with_tools(tools),
            _ => request,
        }
    }

    /// Send one completion, retrying transient failures.
    ///
    /// `on_retry` is forwarded to [`call_with_retry`].
    pub async fn complete<R>(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<Value>>,
        on_retry: R,
    ) -> Result<CompletionResponse, GatewayError>
    where
        R: FnMut(u32, Duration, &GatewayError),
    {
        let request = self.build_request(messages, tools);
        let request = &request;
        let gateway = &self.gateway;

        call_with_retry(&self.retry, on_retry, |attempt| {
            debug!(
                model = %request.model,
                attempt,
                messages = request.messages.len(),
                tools = request.tools.as_ref().map_or(0, Vec::len),
                "Requesting completion"
            );
            gateway.complete(request)
        })
        .await
    }
}
