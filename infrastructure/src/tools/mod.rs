//! Tool infrastructure
//!
//! - [`ToolRegistry`]: name → handler map with category index and error ledgers
//! - [`JsonSchemaToolConverter`]: descriptor → chat-completion function schema
//! - [`BuiltinToolProvider`]: tools that are always available

pub mod builtin;
pub mod registry;
pub mod schema;

pub use builtin::{BUILTIN_PRIORITY, BuiltinToolProvider};
pub use registry::ToolRegistry;
pub use schema::{JsonSchemaToolConverter, SchemaProfile};
