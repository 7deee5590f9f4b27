//! Session domain entities

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tool invocation requested by the model.
///
/// `raw_arguments` is kept exactly as the model emitted it; parsing happens
/// at dispatch time so that malformed JSON can be reported back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Opaque id, unique within one completion response
    pub id: String,
    pub function_name: String,
    pub raw_arguments: String,
}

impl ToolCallRequest {
    pub fn new(
        id: impl Into<String>,
        function_name: impl Into<String>,
        raw_arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            function_name: function_name.into(),
            raw_arguments: raw_arguments.into(),
        }
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Option<String>,
    /// Only on assistant messages that request tools
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
    /// Only on tool messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Only on tool messages: the tool that produced the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// Assistant message carrying tool calls; content is often empty.
    pub fn assistant_with_tool_calls(
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn tool(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }

    /// Content or the empty string.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Violations of the tool-call/response pairing rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("tool call '{id}' has no tool response")]
    UnansweredToolCall { id: String },

    #[error("tool message '{id}' does not answer the expected tool call")]
    UnexpectedToolMessage { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Tool).unwrap(), r#""tool""#);
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_tool_message_fields() {
        let msg = Message::tool("call_1", "lookup", "{\"temp\":72}");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(msg.name.as_deref(), Some("lookup"));
        assert!(!msg.has_tool_calls());
    }

    #[test]
    fn test_message_json_shape() {
        let msg = Message::assistant_with_tool_calls(
            None,
            vec![ToolCallRequest::new("call_1", "lookup", "{\"q\":\"weather\"}")],
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert!(json["content"].is_null());
        assert_eq!(json["tool_calls"][0]["function_name"], "lookup");
        assert!(json.get("tool_call_id").is_none());

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
        assert_eq!(back.text(), "");
    }
}
