//! Completion response types
//!
//! A provider answers every completion with one assistant [`Message`],
//! optionally carrying tool calls. [`CompletionResponse`] wraps that message
//! with the provider's finish reason and token usage.
//!
//! # Examples
//!
//! ```
//! use relay_domain::session::response::CompletionResponse;
//!
//! let response = CompletionResponse::from_text("Hello!");
//! assert_eq!(response.text(), "Hello!");
//! assert!(!response.has_tool_calls());
//! ```

use super::entities::{Message, ToolCallRequest};
use serde::{Deserialize, Serialize};

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of turn
    Stop,
    /// The model wants tools executed
    ToolCalls,
    /// Hit the max token limit
    Length,
    ContentFilter,
    /// Any other provider-specific reason
    Other(String),
}

impl FinishReason {
    /// Map a provider's finish reason string.
    ///
    /// Both the OpenAI (`"stop"`, `"tool_calls"`) and Anthropic-style
    /// (`"end_turn"`, `"tool_use"`, `"max_tokens"`) spellings are understood.
    pub fn from_provider(reason: &str) -> Self {
        match reason {
            "stop" | "end_turn" | "stop_sequence" => FinishReason::Stop,
            "tool_calls" | "tool_use" | "function_call" => FinishReason::ToolCalls,
            "length" | "max_tokens" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// One completion result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The assistant message (role is always assistant)
    pub message: Message,
    pub finish_reason: Option<FinishReason>,
    pub model: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            finish_reason: None,
            model: None,
            usage: None,
        }
    }

    /// Plain-text response with no tool calls.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(Message::assistant(text)).with_finish_reason(FinishReason::Stop)
    }

    /// Response requesting the given tool calls.
    pub fn from_tool_calls(content: Option<String>, calls: Vec<ToolCallRequest>) -> Self {
        Self::new(Message::assistant_with_tool_calls(content, calls))
            .with_finish_reason(FinishReason::ToolCalls)
    }

    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn text(&self) -> &str {
        self.message.text()
    }

    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        &self.message.tool_calls
    }

    pub fn has_tool_calls(&self) -> bool {
        self.message.has_tool_calls()
    }

    pub fn into_message(self) -> Message {
        self.message
    }
}
