//! Session and transcript storage from TOML (`[session]`, `[logging]`)

use crate::persistence::JsonSessionRepository;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ```toml
/// [session]
/// directory = "~/.local/share/toolrelay/sessions"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    pub directory: Option<String>,
}

impl FileSessionConfig {
    pub fn directory(&self) -> PathBuf {
        self.directory
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(JsonSessionRepository::default_dir)
    }
}

/// ```toml
/// [logging]
/// conversation_log = "~/.local/share/toolrelay/conversation.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of conversation events; disabled when unset
    pub conversation_log: Option<String>,
}

impl FileLoggingConfig {
    pub fn conversation_log_path(&self) -> Option<PathBuf> {
        self.conversation_log.as_deref().map(expand_home)
    }
}

/// Expand a leading `~/` to the home directory.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_directory() {
        let config = FileSessionConfig {
            directory: Some("/tmp/relay-sessions".into()),
        };
        assert_eq!(config.directory(), PathBuf::from("/tmp/relay-sessions"));
    }

    #[test]
    fn test_default_directory() {
        let dir = FileSessionConfig::default().directory();
        assert!(dir.ends_with("sessions"));
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/x.jsonl"), home.join("x.jsonl"));
        }
        assert_eq!(expand_home("rel/x.jsonl"), PathBuf::from("rel/x.jsonl"));
        assert!(FileLoggingConfig::default().conversation_log_path().is_none());
    }
}
