//! Tool domain value objects: the error and outcome types
//!
//! A tool returns `Result<Value, ToolError>`. Whatever happens, the dispatch
//! loop turns the outcome into exactly one tool message, so a [`ToolError`]
//! is content for the model rather than a failure of the turn.

use super::coercion::CoercionError;
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Error produced while resolving, preparing or running a tool call.
///
/// | Code | Raised when |
/// |------|-------------|
/// | `NOT_FOUND` | the requested tool is not registered |
/// | `INVALID_ARGUMENT` | arguments are malformed, fail validation or coercion |
/// | `EXECUTION_FAILED` | the tool body failed |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "INVALID_ARGUMENT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Tool not found: {}", name.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == "NOT_FOUND"
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

impl From<ValidationError> for ToolError {
    fn from(e: ValidationError) -> Self {
        ToolError::invalid_argument(e.to_string())
    }
}

impl ToolError {
    /// Coercion failure for a named parameter.
    pub fn coercion(parameter: &str, e: CoercionError) -> Self {
        ToolError::invalid_argument(format!("Parameter '{}': {}", parameter, e))
    }
}

/// How one tool call ended, as reported to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallOutcome {
    pub tool_name: String,
    pub tool_call_id: String,
    pub success: bool,
    /// Content of the tool message appended to the transcript
    pub content: String,
    pub duration_ms: u64,
}

impl ToolCallOutcome {
    pub fn success(
        tool_name: impl Into<String>,
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_call_id: tool_call_id.into(),
            success: true,
            content: content.into(),
            duration_ms: 0,
        }
    }

    pub fn failure(
        tool_name: impl Into<String>,
        tool_call_id: impl Into<String>,
        error: &ToolError,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_call_id: tool_call_id.into(),
            success: false,
            content: error.to_string(),
            duration_ms: 0,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }
}
