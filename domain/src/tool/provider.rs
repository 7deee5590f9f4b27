//! Tool handler and provider abstractions
//!
//! A [`ToolHandler`] is one callable tool: a descriptor plus an async body.
//! A [`ToolProvider`] is a discovery unit that yields handlers; the registry
//! runs every provider once at startup and records the ones that fail.
//!
//! ```text
//!            ToolRegistry (name -> handler, category -> names)
//!                 ▲                ▲                ▲
//!          discover()        discover()        discover()
//!                 │                │                │
//!         ┌──────────────┐ ┌──────────────┐ ┌──────────────┐
//!         │   Builtin    │ │   Plugin A   │ │   Plugin B   │
//!         └──────────────┘ └──────────────┘ └──────────────┘
//!          priority: -100    priority: 0       priority: 0
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use super::entities::{ExecutionContext, ToolDescriptor};
use super::value_objects::ToolError;

/// Error type for discovery units
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider is not available (e.g., missing dependency)
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    /// Failed to load tools from the provider
    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// A callable tool.
///
/// The dispatch loop calls [`invoke`](Self::invoke) with arguments that have
/// already been parsed, validated (for strict tools) and coerced. Any error
/// returned here becomes the content of the tool message.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn descriptor(&self) -> &ToolDescriptor;

    async fn invoke(&self, ctx: &ExecutionContext) -> Result<Value, ToolError>;

    fn name(&self) -> &str {
        &self.descriptor().name
    }
}

/// Tool backed by an async closure.
///
/// # Example
///
/// ```
/// use relay_domain::tool::{FnTool, ToolDescriptor, ToolHandler};
/// use serde_json::json;
///
/// let tool = FnTool::new(ToolDescriptor::new("ping", "Reply with pong"), |_ctx| async {
///     Ok(json!("pong"))
/// });
/// assert_eq!(tool.name(), "ping");
/// ```
pub struct FnTool<F> {
    descriptor: ToolDescriptor,
    func: F,
}

impl<F, Fut> FnTool<F>
where
    F: Fn(ExecutionContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    pub fn new(descriptor: ToolDescriptor, func: F) -> Self {
        Self { descriptor, func }
    }

    pub fn into_handler(self) -> Arc<dyn ToolHandler>
    where
        F: 'static,
    {
        Arc::new(self)
    }
}

#[async_trait]
impl<F, Fut> ToolHandler for FnTool<F>
where
    F: Fn(ExecutionContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, ctx: &ExecutionContext) -> Result<Value, ToolError> {
        (self.func)(ctx.clone()).await
    }
}

/// A discovery unit yielding tools.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Unique identifier, used as the source key for discovery errors
    fn id(&self) -> &str;

    /// Display name for user-facing output
    fn display_name(&self) -> &str;

    /// Discovery order (higher runs first). On a name clash the tool from
    /// the provider discovered first wins.
    fn priority(&self) -> i32 {
        0
    }

    /// Check whether the provider can load at all
    async fn is_available(&self) -> bool {
        true
    }

    /// Load the provider's tools
    async fn discover(&self) -> Result<Vec<Arc<dyn ToolHandler>>, ProviderError>;
}
