//! Tool domain entities

use super::coercion::CoercionMode;
use super::types::ParamType;
use super::validation::Validator;
use super::value_objects::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{Duration, Instant};

/// Category assigned to tools that declare none.
pub const DEFAULT_CATEGORY: &str = "general";

/// Declarative tags on a tool, used for discovery, reporting and selective
/// strict validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCapabilities {
    /// Categories for grouping (never empty)
    pub categories: Vec<String>,
    pub requires_network: bool,
    pub requires_filesystem: bool,
    pub rate_limited: bool,
    /// Calls have no observable side effects and may run concurrently with
    /// other calls to the same tool.
    pub side_effect_free: bool,
    /// Validate arguments against the declared parameters before coercion.
    pub strict_validation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_usage: Option<String>,
}

impl Default for ToolCapabilities {
    fn default() -> Self {
        Self {
            categories: vec![DEFAULT_CATEGORY.to_string()],
            requires_network: false,
            requires_filesystem: false,
            rate_limited: false,
            side_effect_free: false,
            strict_validation: false,
            version: None,
            author: None,
            example_usage: None,
        }
    }
}

impl ToolCapabilities {
    /// Replace the categories. An empty list keeps the default category.
    pub fn with_categories<S: Into<String>>(mut self, categories: impl IntoIterator<Item = S>) -> Self {
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        if !categories.is_empty() {
            self.categories = categories;
        }
        self
    }

    pub fn requires_network(mut self) -> Self {
        self.requires_network = true;
        self
    }

    pub fn requires_filesystem(mut self) -> Self {
        self.requires_filesystem = true;
        self
    }

    pub fn rate_limited(mut self) -> Self {
        self.rate_limited = true;
        self
    }

    pub fn side_effect_free(mut self) -> Self {
        self.side_effect_free = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_validation = true;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example_usage = Some(example.into());
        self
    }
}

/// Parameter specification for a tool
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Declared type; [`ParamType::Any`] when unannotated
    pub param_type: ParamType,
    /// Checks run under strict validation, in order
    pub validators: Vec<Validator>,
    /// Coercion tolerance; `None` follows the tool's `strict_validation` flag
    pub coercion: Option<CoercionMode>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: ParamType::Any,
            validators: Vec::new(),
            coercion: None,
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Always pass unconvertible values through to the tool.
    pub fn lenient(mut self) -> Self {
        self.coercion = Some(CoercionMode::Lenient);
        self
    }

    /// Always reject unconvertible values.
    pub fn strict(mut self) -> Self {
        self.coercion = Some(CoercionMode::Strict);
        self
    }
}

/// Invocation contract of a tool, as exposed to the model.
///
/// Immutable once the tool is registered.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Unique name of the tool (e.g., "get_current_datetime")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterSpec>,
    /// Description of the returned value
    pub returns: Option<String>,
    pub capabilities: ToolCapabilities,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            returns: None,
            capabilities: ToolCapabilities::default(),
        }
    }

    pub fn with_parameter(mut self, param: ParameterSpec) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = Some(returns.into());
        self
    }

    pub fn with_capabilities(mut self, capabilities: ToolCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| p.required)
    }

    pub fn categories(&self) -> &[String] {
        &self.capabilities.categories
    }

    /// Effective coercion mode for one of this tool's parameters.
    pub fn coercion_mode(&self, param: &ParameterSpec) -> CoercionMode {
        param.coercion.unwrap_or(if self.capabilities.strict_validation {
            CoercionMode::Strict
        } else {
            CoercionMode::Lenient
        })
    }
}

/// Per-call record handed to a tool handler.
///
/// Created right before invocation and dropped once the tool message is in
/// the transcript.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Tool name as requested by the model
    pub name: String,
    /// Opaque id of the originating tool call
    pub tool_call_id: String,
    /// Coerced arguments
    pub arguments: Map<String, Value>,
    pub started_at: Instant,
}

impl ExecutionContext {
    pub fn new(
        name: impl Into<String>,
        tool_call_id: impl Into<String>,
        arguments: Map<String, Value>,
    ) -> Self {
        Self {
            name: name.into(),
            tool_call_id: tool_call_id.into(),
            arguments,
            started_at: Instant::now(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key).filter(|v| !v.is_null())
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn require_string(&self, key: &str) -> Result<&str, ToolError> {
        self.get_string(key)
            .ok_or_else(|| ToolError::invalid_argument(format!("Missing required argument: {}", key)))
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
