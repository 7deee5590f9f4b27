//! Clock and host information tools.

use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use chrono::{Local, Utc};
use relay_domain::{
    ExecutionContext, ParamType, ParameterSpec, ToolCapabilities, ToolDescriptor, ToolError,
    ToolHandler,
};
use serde_json::{Value, json};

pub const GET_CURRENT_DATETIME: &str = "get_current_datetime";
pub const GET_SYSTEM_INFO: &str = "get_system_info";

const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local (or UTC) time as a formatted string.
pub struct CurrentDateTimeTool {
    descriptor: ToolDescriptor,
}

impl CurrentDateTimeTool {
    pub fn new() -> Self {
        let descriptor = ToolDescriptor::new(GET_CURRENT_DATETIME, "Get the current date and time.")
            .with_parameter(
                ParameterSpec::new(
                    "format",
                    "strftime format string (default \"%Y-%m-%d %H:%M:%S\")",
                    false,
                )
                .with_type(ParamType::optional(ParamType::string())),
            )
            .with_parameter(
                ParameterSpec::new("utc", "Report UTC instead of local time", false)
                    .with_type(ParamType::optional(ParamType::boolean())),
            )
            .with_returns("The current date and time")
            .with_capabilities(
                ToolCapabilities::default()
                    .with_categories(["system"])
                    .side_effect_free(),
            );
        Self { descriptor }
    }
}

impl Default for CurrentDateTimeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for CurrentDateTimeTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let format = ctx.get_string("format").unwrap_or(DEFAULT_FORMAT);
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(ToolError::invalid_argument(format!(
                "Invalid datetime format: {}",
                format
            )));
        }

        let text = if ctx.get_bool("utc").unwrap_or(false) {
            Utc::now().format(format).to_string()
        } else {
            Local::now().format(format).to_string()
        };
        Ok(json!(text))
    }
}

/// Basic facts about the host.
pub struct SystemInfoTool {
    descriptor: ToolDescriptor,
}

impl SystemInfoTool {
    pub fn new() -> Self {
        let descriptor = ToolDescriptor::new(GET_SYSTEM_INFO, "Get basic system information.")
            .with_returns("Operating system, architecture and CPU count")
            .with_capabilities(
                ToolCapabilities::default()
                    .with_categories(["system"])
                    .side_effect_free(),
            );
        Self { descriptor }
    }
}

impl Default for SystemInfoTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for SystemInfoTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Ok(json!({
            "system": std::env::consts::OS,
            "family": std::env::consts::FAMILY,
            "machine": std::env::consts::ARCH,
            "cpu_count": cpus,
            "toolrelay_version": env!("CARGO_PKG_VERSION"),
        }))
    }
}
