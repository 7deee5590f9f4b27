//! Single tool-call dispatch.
//!
//! Turns one [`ToolCallRequest`] into exactly one tool message. Every
//! failure along the way (unknown tool, unparseable arguments, validation,
//! tool error) becomes the message content instead of an `Err`.

use crate::ports::tool_registry::ToolRegistryPort;
use relay_domain::core::string::preview;
use relay_domain::tool::{coerce, validate_arguments};
use relay_domain::{
    CoercionMode, ExecutionContext, Message, ToolCallOutcome, ToolCallRequest, ToolDescriptor,
    ToolError,
};
use futures::FutureExt;
use serde_json::{Map, Value};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Executes tool calls against a registry.
#[derive(Clone)]
pub struct ToolInvoker {
    registry: Arc<dyn ToolRegistryPort>,
}

impl ToolInvoker {
    pub fn new(registry: Arc<dyn ToolRegistryPort>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<dyn ToolRegistryPort> {
        &self.registry
    }

    /// Dispatch one call. Always yields a tool message paired with `call.id`.
    pub async fn invoke(&self, call: &ToolCallRequest) -> (Message, ToolCallOutcome) {
        let started = Instant::now();
        let outcome = match self.run(call).await {
            Ok(value) => {
                let content = render_result(&value);
                info!(
                    tool = %call.function_name,
                    id = %call.id,
                    "Tool call succeeded"
                );
                ToolCallOutcome::success(&call.function_name, &call.id, content)
            }
            Err(e) => {
                warn!(tool = %call.function_name, id = %call.id, error = %e, "Tool call failed");
                ToolCallOutcome::failure(&call.function_name, &call.id, &e)
            }
        }
        .with_duration(started.elapsed());

        let message = Message::tool(&call.id, &call.function_name, outcome.content.clone());
        (message, outcome)
    }

    async fn run(&self, call: &ToolCallRequest) -> Result<Value, ToolError> {
        let handler = self
            .registry
            .lookup(&call.function_name)
            .ok_or_else(|| ToolError::tool_not_found(&call.function_name))?;

        let raw = parse_arguments(&call.raw_arguments)?;
        let descriptor = handler.descriptor();

        if descriptor.capabilities.strict_validation {
            validate_arguments(descriptor, &raw)?;
        }

        let arguments = coerce_arguments(descriptor, raw)?;
        let args_preview = preview(&serde_json::Value::Object(arguments.clone()).to_string(), 120);
        debug!(tool = %call.function_name, args = %args_preview, "Invoking tool");

        let ctx = ExecutionContext::new(&call.function_name, &call.id, arguments);
        AssertUnwindSafe(handler.invoke(&ctx))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(ToolError::execution_failed(format!(
                    "Tool panicked: {}",
                    panic_message(payload.as_ref())
                )))
            })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Parse the model's raw argument string into a JSON object.
pub fn parse_arguments(raw: &str) -> Result<Map<String, Value>, ToolError> {
    if raw.trim().is_empty() {
        return Err(ToolError::invalid_argument(
            "Invalid arguments: arguments must be a non-empty JSON string",
        ));
    }

    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ToolError::invalid_argument(format!("Invalid JSON arguments: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ToolError::invalid_argument(format!(
            "Arguments must be a JSON object, got {}",
            relay_domain::tool::types::json_kind(&other)
        ))),
    }
}

/// Coerce every declared argument; unknown keys pass through untouched.
///
/// A lenient parameter whose value cannot be coerced keeps its raw value,
/// leaving the tool as the final judge. A strict one fails the call.
fn coerce_arguments(
    descriptor: &ToolDescriptor,
    raw: Map<String, Value>,
) -> Result<Map<String, Value>, ToolError> {
    let mut out = Map::with_capacity(raw.len());

    for (key, value) in raw {
        let Some(param) = descriptor.parameter(&key) else {
            out.insert(key, value);
            continue;
        };
        if value.is_null() {
            out.insert(key, value);
            continue;
        }

        let mode = descriptor.coercion_mode(param);
        match coerce(&value, &param.param_type, mode) {
            Ok(coerced) => {
                out.insert(key, coerced);
            }
            Err(e) if mode == CoercionMode::Lenient => {
                debug!(tool = %descriptor.name, param = %key, error = %e, "Passing raw argument through");
                out.insert(key, value);
            }
            Err(e) => return Err(ToolError::coercion(&key, e)),
        }
    }

    Ok(out)
}

/// Tool message content for a successful result.
pub fn render_result(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::tool_registry::RegistryStatus;
    use relay_domain::{FnTool, ParamType, ParameterSpec, ToolCapabilities, ToolHandler};
    use serde_json::json;
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapRegistry {
        tools: HashMap<String, Arc<dyn ToolHandler>>,
    }

    impl MapRegistry {
        fn with(mut self, handler: Arc<dyn ToolHandler>) -> Self {
            self.tools.insert(handler.name().to_string(), handler);
            self
        }
    }

    impl ToolRegistryPort for MapRegistry {
        fn lookup(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
            self.tools.get(name).cloned()
        }

        fn descriptors(&self) -> Vec<ToolDescriptor> {
            self.tools.values().map(|h| h.descriptor().clone()).collect()
        }

        fn by_category(&self, _category: &str) -> BTreeSet<String> {
            BTreeSet::new()
        }

        fn status(&self) -> RegistryStatus {
            RegistryStatus::default()
        }
    }

    fn recording_tool(
        descriptor: ToolDescriptor,
        seen: Arc<Mutex<Vec<Map<String, Value>>>>,
    ) -> Arc<dyn ToolHandler> {
        FnTool::new(descriptor, move |ctx: ExecutionContext| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(ctx.arguments.clone());
                Ok(json!({"ok": true}))
            }
        })
        .into_handler()
    }

    fn count_descriptor() -> ToolDescriptor {
        ToolDescriptor::new("count", "Count things").with_parameter(
            ParameterSpec::new("n", "How many", true).with_type(ParamType::integer()),
        )
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let invoker = ToolInvoker::new(Arc::new(MapRegistry::default()));
        let call = ToolCallRequest::new("c1", "Y", "{}");

        let (message, outcome) = invoker.invoke(&call).await;

        assert!(!outcome.success);
        assert_eq!(message.tool_call_id.as_deref(), Some("c1"));
        assert_eq!(message.name.as_deref(), Some("Y"));
        assert!(message.text().contains("Tool not found: Y"));
    }

    #[tokio::test]
    async fn test_malformed_json_never_invokes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = MapRegistry::default().with(recording_tool(
            ToolDescriptor::new("Z", "Zed"),
            seen.clone(),
        ));
        let invoker = ToolInvoker::new(Arc::new(registry));

        let (message, outcome) = invoker.invoke(&ToolCallRequest::new("c1", "Z", "{bad")).await;

        assert!(!outcome.success);
        assert!(message.text().contains("Invalid JSON arguments"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_parse_arguments_rejects_empty_and_non_object() {
        assert!(
            parse_arguments("  ")
                .unwrap_err()
                .message
                .contains("non-empty")
        );
        assert!(
            parse_arguments("[1, 2]")
                .unwrap_err()
                .message
                .contains("got array")
        );
        assert_eq!(parse_arguments(r#"{"a":1}"#).unwrap()["a"], json!(1));
    }

    #[tokio::test]
    async fn test_lenient_coercion_converts_strings() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = MapRegistry::default().with(recording_tool(count_descriptor(), seen.clone()));
        let invoker = ToolInvoker::new(Arc::new(registry));

        let (_, outcome) = invoker
            .invoke(&ToolCallRequest::new("c1", "count", r#"{"n": "42"}"#))
            .await;

        assert!(outcome.success);
        assert_eq!(seen.lock().unwrap()[0]["n"], json!(42));
    }

    #[tokio::test]
    async fn test_lenient_coercion_passes_raw_value_through() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = MapRegistry::default().with(recording_tool(count_descriptor(), seen.clone()));
        let invoker = ToolInvoker::new(Arc::new(registry));

        let (_, outcome) = invoker
            .invoke(&ToolCallRequest::new("c1", "count", r#"{"n": "many"}"#))
            .await;

        assert!(outcome.success);
        assert_eq!(seen.lock().unwrap()[0]["n"], json!("many"));
    }

    #[tokio::test]
    async fn test_strict_tool_reports_validation_error() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let descriptor = count_descriptor().with_capabilities(ToolCapabilities::default().strict());
        let registry = MapRegistry::default().with(recording_tool(descriptor, seen.clone()));
        let invoker = ToolInvoker::new(Arc::new(registry));

        let (message, outcome) = invoker
            .invoke(&ToolCallRequest::new("c1", "count", r#"{"n": "many"}"#))
            .await;

        assert!(!outcome.success);
        assert!(message.text().contains("Parameter 'n'"));
        assert!(seen.lock().unwrap().is_empty());

        let (message, _) = invoker.invoke(&ToolCallRequest::new("c2", "count", "{}")).await;
        assert!(message.text().contains("Required parameter is missing"));
    }

    #[tokio::test]
    async fn test_tool_error_becomes_content() {
        let failing = FnTool::new(ToolDescriptor::new("boom", "Fails"), |_ctx| async {
            Err(ToolError::execution_failed("disk on fire"))
        })
        .into_handler();
        let invoker = ToolInvoker::new(Arc::new(MapRegistry::default().with(failing)));

        let (message, outcome) = invoker.invoke(&ToolCallRequest::new("c1", "boom", "{}")).await;

        assert!(!outcome.success);
        assert_eq!(message.text(), "[EXECUTION_FAILED] disk on fire");
    }

    #[tokio::test]
    async fn test_panicking_tool_becomes_content() {
        let panicking = FnTool::new(ToolDescriptor::new("crash", "Panics"), |_ctx| async {
            if true {
                panic!("index out of bounds");
            }
            Ok(json!(null))
        })
        .into_handler();
        let invoker = ToolInvoker::new(Arc::new(MapRegistry::default().with(panicking)));

        let (message, outcome) = invoker.invoke(&ToolCallRequest::new("c1", "crash", "{}")).await;

        assert!(!outcome.success);
        assert_eq!(message.tool_call_id.as_deref(), Some("c1"));
        assert_eq!(
            message.text(),
            "[EXECUTION_FAILED] Tool panicked: index out of bounds"
        );
    }

    #[test]
    fn test_render_result() {
        assert_eq!(render_result(&json!("plain")), "plain");
        assert_eq!(render_result(&json!({"temp": 72})), r#"{"temp":72}"#);
    }
}
