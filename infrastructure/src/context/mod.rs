//! Prompt context from the host environment
//!
//! [`SystemPromptContext`] implements the
//! [`PromptContextProvider`](relay_application::PromptContextProvider) port
//! with the local clock and platform.

mod system;

pub use system::SystemPromptContext;
