//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod completion_gateway;
pub mod conversation_logger;
pub mod dispatch_progress;
pub mod prompt_context;
pub mod tool_registry;
pub mod tool_schema;
