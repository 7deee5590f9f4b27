//! Session management use case: reset, save, load, list.

use relay_domain::session::repository::is_valid_session_name;
use relay_domain::{ConversationSession, SessionRepository, SessionStoreError};
use std::sync::Arc;
use tracing::info;

pub struct ManageSessionUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl ManageSessionUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Clear the transcript, keeping the system message.
    pub fn reset(&self, session: &mut ConversationSession) {
        session.reset();
        info!("Session reset");
    }

    pub async fn save(
        &self,
        name: &str,
        session: &ConversationSession,
    ) -> Result<(), SessionStoreError> {
        check_name(name)?;
        self.repository.save(name, session).await?;
        info!(session = %name, messages = session.len(), "Session saved");
        Ok(())
    }

    /// Load a snapshot, rejecting transcripts with unpaired tool calls.
    pub async fn load(&self, name: &str) -> Result<ConversationSession, SessionStoreError> {
        check_name(name)?;
        let session = self.repository.load(name).await?;
        session
            .verify_tool_pairing()
            .map_err(|e| SessionStoreError::Corrupt(format!("{}: {}", name, e)))?;
        info!(session = %name, messages = session.len(), "Session loaded");
        Ok(session)
    }

    pub async fn list(&self) -> Result<Vec<String>, SessionStoreError> {
        let mut names = self.repository.list().await?;
        names.sort();
        Ok(names)
    }
}

fn check_name(name: &str) -> Result<(), SessionStoreError> {
    if is_valid_session_name(name) {
        Ok(())
    } else {
        Err(SessionStoreError::InvalidName(name.to_string()))
    }
}
