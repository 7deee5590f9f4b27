//! JSONL file writer for conversation events.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying `type` and
//! `timestamp` next to the event's own fields. The file is opened in append
//! mode so one log can span several runs.

use parking_lot::Mutex;
use relay_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the log file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Like [`open`](Self::open) but logs the failure and returns `None`.
    pub fn try_open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(logger) => Some(logger),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not open conversation log");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: ConversationEvent) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let mut map = match event.payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::String(event.event_type.to_string()));
    map.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(line) = serde_json::to_string(&record(event)) else {
            return;
        };

        let mut writer = self.writer.lock();
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!(path = %self.path.display(), error = %e, "Failed to write conversation event");
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        let _ = self.writer.lock().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/chat.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new("user_message", json!({"text": "hi"})));
        logger.log(ConversationEvent::new(
            "tool_call",
            json!({"tool": "get_current_datetime", "id": "c1", "arguments": "{}"}),
        ));
        drop(logger);

        let records = lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "user_message");
        assert_eq!(records[0]["text"], "hi");
        assert_eq!(records[1]["tool"], "get_current_datetime");
        assert!(records[1]["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_non_object_payload_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new("error", json!("boom")));
        drop(logger);

        let records = lines(&path);
        assert_eq!(records[0]["data"], "boom");
        assert_eq!(records[0]["type"], "error");
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");

        for text in ["first", "second"] {
            let logger = JsonlConversationLogger::open(&path).unwrap();
            logger.log(ConversationEvent::new("user_message", json!({"text": text})));
        }

        let records = lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["text"], "second");
    }

    #[test]
    fn test_try_open_fails_softly() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a log file
        assert!(JsonlConversationLogger::try_open(dir.path()).is_none());
    }
}
