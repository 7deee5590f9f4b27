//! Session repository trait

use super::conversation::ConversationSession;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from session persistence
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Invalid session name: {0}")]
    InvalidName(String),

    #[error("Session storage failed: {0}")]
    Storage(String),

    #[error("Session data is corrupt: {0}")]
    Corrupt(String),
}

/// Repository for named conversation snapshots.
///
/// Implementations must round-trip the message list exactly. Storage format
/// is up to the implementation (the infrastructure layer ships a JSON file
/// store).
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn save(&self, name: &str, session: &ConversationSession)
    -> Result<(), SessionStoreError>;

    async fn load(&self, name: &str) -> Result<ConversationSession, SessionStoreError>;

    /// Names of saved sessions, sorted.
    async fn list(&self) -> Result<Vec<String>, SessionStoreError>;
}

/// Session names double as file stems, so they are restricted to a
/// conservative character set.
pub fn is_valid_session_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_names() {
        assert!(is_valid_session_name("chat-2024_01"));
        assert!(!is_valid_session_name(""));
        assert!(!is_valid_session_name("../etc/passwd"));
        assert!(!is_valid_session_name("with space"));
        assert!(!is_valid_session_name(&"x".repeat(65)));
    }
}
