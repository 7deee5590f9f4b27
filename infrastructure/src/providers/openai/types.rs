//! Wire types and conversions for the Chat Completions protocol
//!
//! Domain → wire for requests, wire → domain for responses, and the HTTP
//! status / transport error mapping onto [`GatewayError`].

use relay_application::ports::completion_gateway::{CompletionRequest, GatewayError};
use relay_domain::core::string::truncate;
use relay_domain::{
    CompletionResponse, FinishReason, Message, TokenUsage, ToolCallRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest error body carried into a [`GatewayError`].
const MAX_ERROR_BODY: usize = 512;

// ─── Domain → Wire ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<&'a [Value]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'static str,
    /// Explicit `null` for assistant messages that only carry tool calls
    pub content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireToolCall<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub call_type: &'static str,
    pub function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireFunction<'a> {
    pub name: &'a str,
    pub arguments: &'a str,
}

pub(crate) fn build_request(request: &CompletionRequest) -> ChatRequest<'_> {
    let tools = request.tools.as_deref().filter(|t| !t.is_empty());
    ChatRequest {
        model: &request.model,
        messages: request.messages.iter().map(wire_message).collect(),
        tools,
        tool_choice: tools.map(|_| "auto"),
        temperature: request.sampling.temperature,
        top_p: request.sampling.top_p,
        max_tokens: request.sampling.max_tokens,
        seed: request.sampling.seed,
    }
}

fn wire_message(message: &Message) -> WireMessage<'_> {
    WireMessage {
        role: message.role.as_str(),
        content: message.content.as_deref(),
        tool_calls: message
            .tool_calls
            .iter()
            .map(|call| WireToolCall {
                id: &call.id,
                call_type: "function",
                function: WireFunction {
                    name: &call.function_name,
                    arguments: &call.raw_arguments,
                },
            })
            .collect(),
        tool_call_id: message.tool_call_id.as_deref(),
        name: message.name.as_deref(),
    }
}

// ─── Wire → Domain ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub model: Option<String>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseToolCall {
    pub id: String,
    pub function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseFunction {
    pub name: String,
    /// Some servers send an object instead of the JSON string
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

/// Convert a parsed body into a domain response. Only the first choice is used.
pub(crate) fn convert_response(body: ChatResponse) -> Result<CompletionResponse, GatewayError> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::InvalidResponse("response has no choices".to_string()))?;

    let calls: Vec<ToolCallRequest> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            let arguments = match call.function.arguments {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            ToolCallRequest::new(call.id, call.function.name, arguments)
        })
        .collect();

    let content = choice.message.content;
    let mut response = if calls.is_empty() {
        CompletionResponse::from_text(content.unwrap_or_default())
    } else {
        CompletionResponse::from_tool_calls(content.filter(|c| !c.is_empty()), calls)
    };

    if let Some(reason) = choice.finish_reason {
        response = response.with_finish_reason(FinishReason::from_provider(&reason));
    }
    if let Some(model) = body.model {
        response = response.with_model(model);
    }
    if let Some(usage) = body.usage {
        response = response.with_usage(TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        });
    }
    Ok(response)
}

// ─── Errors ──────────────────────────────────────────────────────

/// Map a non-success HTTP status and its body.
pub(crate) fn convert_status(status: u16, body: &str) -> GatewayError {
    let message = error_message(body);
    match status {
        429 => GatewayError::RateLimited(message),
        503 => GatewayError::Unavailable(message),
        _ => GatewayError::Http { status, message },
    }
}

/// Map a transport-level failure.
pub(crate) fn convert_transport_error(e: &reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

/// Prefer `error.message` from a JSON error body, else the raw body.
fn error_message(body: &str) -> String {
    let extracted = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        });
    let message = extracted.unwrap_or_else(|| body.trim().to_string());
    truncate(&message, MAX_ERROR_BODY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_application::SamplingParams;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let messages = vec![
            Message::system("be brief"),
            Message::user("weather?"),
            Message::assistant_with_tool_calls(
                None,
                vec![ToolCallRequest::new("call_1", "weather", r#"{"city":"Oslo"}"#)],
            ),
            Message::tool("call_1", "weather", "sunny"),
        ];
        let request = CompletionRequest::new("m", messages, SamplingParams::default())
            .with_tools(vec![json!({"type": "function", "function": {"name": "weather"}})]);

        let body = serde_json::to_value(build_request(&request)).unwrap();

        assert_eq!(body["model"], "m");
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["temperature"], json!(0.25f32));
        assert_eq!(body["max_tokens"], 8192);
        assert!(body.get("seed").is_none());

        let wire = body["messages"].as_array().unwrap();
        assert_eq!(wire[0], json!({"role": "system", "content": "be brief"}));
        assert_eq!(wire[2]["content"], Value::Null);
        assert_eq!(
            wire[2]["tool_calls"][0],
            json!({
                "id": "call_1",
                "type": "function",
                "function": {"name": "weather", "arguments": "{\"city\":\"Oslo\"}"}
            })
        );
        assert_eq!(
            wire[3],
            json!({"role": "tool", "content": "sunny", "tool_call_id": "call_1", "name": "weather"})
        );
    }

    #[test]
    fn test_request_without_tools() {
        let request = CompletionRequest::new("m", vec![Message::user("hi")], SamplingParams::default())
            .with_tools(vec![]);
        let body = serde_json::to_value(build_request(&request)).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn test_convert_text_response() {
        let body: ChatResponse = serde_json::from_value(json!({
            "model": "gemini-2.0-flash",
            "choices": [{"message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2}
        }))
        .unwrap();

        let response = convert_response(body).unwrap();
        assert_eq!(response.text(), "Hello");
        assert!(!response.has_tool_calls());
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.model.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(response.usage.unwrap().completion_tokens, 2);
    }

    #[test]
    fn test_convert_tool_call_response() {
        let body: ChatResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [
                        {"id": "a", "type": "function", "function": {"name": "f", "arguments": "{\"x\":1}"}},
                        {"id": "b", "type": "function", "function": {"name": "g", "arguments": {"y": 2}}}
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        }))
        .unwrap();

        let response = convert_response(body).unwrap();
        let calls = response.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].raw_arguments, r#"{"x":1}"#);
        assert_eq!(calls[1].function_name, "g");
        assert_eq!(calls[1].raw_arguments, r#"{"y":2}"#);
        assert_eq!(response.finish_reason, Some(FinishReason::ToolCalls));
    }

    #[test]
    fn test_empty_choices_is_invalid() {
        let body: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            convert_response(body),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_status_mapping() {
        let body = r#"{"error": {"message": "Resource has been exhausted"}}"#;
        assert_eq!(
            convert_status(429, body),
            GatewayError::RateLimited("Resource has been exhausted".into())
        );
        assert!(matches!(convert_status(503, "down"), GatewayError::Unavailable(_)));
        assert!(convert_status(504, "gateway timeout").is_transient());

        let err = convert_status(400, "bad request");
        assert_eq!(
            err,
            GatewayError::Http {
                status: 400,
                message: "bad request".into()
            }
        );
        assert!(!err.is_transient());
    }
}
