//! Domain layer for toolrelay
//!
//! This crate contains the core entities and pure logic of the tool-calling
//! engine. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! A tool is a named callable described by a [`ToolDescriptor`]. Its
//! parameters carry an explicit [`ParamType`] tree, which drives schema
//! generation, argument coercion and strict validation.
//!
//! ## Conversation
//!
//! A [`ConversationSession`] is the ordered transcript of one chat. Every
//! assistant tool call is answered by exactly one tool message before the
//! next completion is requested.
//!
//! ## Dispatch
//!
//! A user turn walks the [`DispatchState`] machine: optional reasoning,
//! then completions alternating with tool dispatch until the model stops
//! asking for tools.

pub mod config;
pub mod core;
pub mod dispatch;
pub mod prompt;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use dispatch::DispatchState;
pub use prompt::{PromptContext, PromptTemplates};
pub use session::{
    conversation::ConversationSession,
    entities::{Message, Role, SessionError, ToolCallRequest},
    repository::{SessionRepository, SessionStoreError},
    response::{CompletionResponse, FinishReason, TokenUsage},
};
pub use tool::{
    CoercionError, CoercionMode, ExecutionContext, FieldSpec, FnTool, ParamType, ParameterSpec,
    PrimitiveType, ProviderError, RecordType, ToolCallOutcome, ToolCapabilities, ToolDescriptor,
    ToolError, ToolHandler, ToolProvider, ValidationError, Validator,
};
