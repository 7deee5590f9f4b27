//! Built-in tool provider
//!
//! Always available and lowest priority, so any other provider may shadow
//! its tools.

use async_trait::async_trait;
use relay_domain::{ProviderError, ToolHandler, ToolProvider};
use std::sync::Arc;

use super::system::{CurrentDateTimeTool, SystemInfoTool};

/// Priority for the built-in provider (lowest, used as fallback)
pub const BUILTIN_PRIORITY: i32 = -100;

#[derive(Debug, Clone, Default)]
pub struct BuiltinToolProvider;

impl BuiltinToolProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolProvider for BuiltinToolProvider {
    fn id(&self) -> &str {
        "builtin"
    }

    fn display_name(&self) -> &str {
        "Built-in Tools"
    }

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    async fn discover(&self) -> Result<Vec<Arc<dyn ToolHandler>>, ProviderError> {
        Ok(vec![
            Arc::new(CurrentDateTimeTool::new()),
            Arc::new(SystemInfoTool::new()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::{GET_CURRENT_DATETIME, GET_SYSTEM_INFO};

    #[tokio::test]
    async fn test_builtin_provider_is_available() {
        assert!(BuiltinToolProvider::new().is_available().await);
    }

    #[tokio::test]
    async fn test_builtin_provider_discover() {
        let tools = BuiltinToolProvider::new().discover().await.unwrap();
        let names: Vec<_> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec![GET_CURRENT_DATETIME, GET_SYSTEM_INFO]);
    }

    #[tokio::test]
    async fn test_builtin_schemas_have_properties() {
        use crate::tools::schema::JsonSchemaToolConverter;
        use relay_application::ToolSchemaPort;

        let converter = JsonSchemaToolConverter::default();
        for tool in BuiltinToolProvider::new().discover().await.unwrap() {
            let schema = converter.tool_to_schema(tool.descriptor());
            let properties = schema["function"]["parameters"]["properties"]
                .as_object()
                .unwrap();
            assert!(!properties.is_empty(), "{} has no properties", tool.name());
        }
    }

    #[test]
    fn test_builtin_provider_priority() {
        assert_eq!(BuiltinToolProvider::new().priority(), BUILTIN_PRIORITY);
    }
}
