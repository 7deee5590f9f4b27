//! OpenAI-compatible Chat Completions provider
//!
//! Speaks `POST {base_url}/v1/chat/completions` over `reqwest`. Works with
//! any endpoint that implements the same JSON protocol (OpenAI, Gemini's
//! compatibility layer, local servers).

mod gateway;
mod types;

pub use gateway::{OpenAiCompatConfig, OpenAiCompatGateway};
