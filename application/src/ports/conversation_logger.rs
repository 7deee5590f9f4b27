//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording turn events
//! (user messages, reasoning plans, tool calls and results, retries) to a
//! machine-readable transcript.
//!
//! This is separate from `tracing`: tracing carries diagnostics for humans,
//! while this port captures what was said and done, one record per event.

use serde_json::Value;

/// A structured conversation event.
pub struct ConversationEvent {
    /// Event type identifier (e.g. "user_message", "tool_call", "retry").
    pub event_type: &'static str,
    /// Event-specific fields
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible; sinks swallow their own I/O errors
/// so that a broken log file never fails a turn.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
