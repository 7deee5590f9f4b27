//! Built-in tool provider module
//!
//! Provides the [`BuiltinToolProvider`] with tools that need no
//! configuration: the local clock and host information.

mod provider;
mod system;

pub use provider::{BUILTIN_PRIORITY, BuiltinToolProvider};
pub use system::{CurrentDateTimeTool, GET_CURRENT_DATETIME, GET_SYSTEM_INFO, SystemInfoTool};
