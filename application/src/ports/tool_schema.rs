//! Tool schema conversion port.
//!
//! Separates "which tools exist" (registry) from "how to serialize them for
//! the provider API" (infrastructure).

use relay_domain::ToolDescriptor;
use serde_json::Value;

/// Port for converting tool descriptors to function-calling JSON.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single descriptor to a `{"type":"function", ...}` envelope.
    fn tool_to_schema(&self, tool: &ToolDescriptor) -> Value;

    /// Convert a catalog, preserving the given order.
    fn catalog_schema(&self, tools: &[ToolDescriptor]) -> Vec<Value> {
        tools.iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
