//! Completion provider adapters
//!
//! Each adapter implements the application layer's
//! [`CompletionGateway`](relay_application::ports::completion_gateway::CompletionGateway).

pub mod openai;

pub use openai::{OpenAiCompatConfig, OpenAiCompatGateway};
