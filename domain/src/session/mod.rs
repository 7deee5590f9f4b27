//! Conversation session domain.
//!
//! - [`entities::Message`] / [`entities::ToolCallRequest`] - transcript entries
//! - [`conversation::ConversationSession`] - the transcript plus the last reasoning plan
//! - [`response::CompletionResponse`] - one assistant reply from a provider
//! - [`repository::SessionRepository`] - trait for session persistence

pub mod conversation;
pub mod entities;
pub mod repository;
pub mod response;
