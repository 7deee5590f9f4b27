//! Application layer for toolrelay
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AgentConfig, DispatchParams, RetryPolicy, SamplingParams};
pub use ports::{
    completion_gateway::{CompletionGateway, CompletionRequest, GatewayError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    dispatch_progress::{DispatchProgressNotifier, NoDispatchProgress},
    prompt_context::{PromptContextProvider, StaticPromptContext},
    tool_registry::{RegistryError, RegistryStatus, ToolRegistryPort},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::completion::CompletionClient;
pub use use_cases::dispatch_loop::{DispatchError, DispatchLoopUseCase, TurnOutput};
pub use use_cases::manage_session::ManageSessionUseCase;
pub use use_cases::retry::call_with_retry;
pub use use_cases::tool_invocation::ToolInvoker;
