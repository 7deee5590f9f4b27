//! Infrastructure layer for toolrelay
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the tool registry and schema converter, the
//! OpenAI-compatible completion gateway, session persistence, the JSONL
//! transcript, and configuration file loading.

pub mod config;
pub mod context;
pub mod logging;
pub mod persistence;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoadError, ConfigLoader, FileConfig};
pub use context::SystemPromptContext;
pub use logging::JsonlConversationLogger;
pub use persistence::JsonSessionRepository;
pub use providers::{OpenAiCompatConfig, OpenAiCompatGateway};
pub use tools::{BuiltinToolProvider, JsonSchemaToolConverter, SchemaProfile, ToolRegistry};
