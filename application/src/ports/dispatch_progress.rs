//! Dispatch progress notification port
//!
//! Callbacks fired while a user turn runs. Implementations live in the
//! presentation layer; every method has a no-op default.

use relay_domain::{DispatchState, ToolCallOutcome, ToolCallRequest};
use std::time::Duration;

pub trait DispatchProgressNotifier: Send + Sync {
    /// Called on every state machine transition
    fn on_state_change(&self, _from: DispatchState, _to: DispatchState) {}

    /// Called with the reasoning plan once it is recorded
    fn on_reasoning(&self, _plan: &str) {}

    fn on_tool_call_started(&self, _call: &ToolCallRequest) {}

    fn on_tool_call_finished(&self, _outcome: &ToolCallOutcome) {}

    /// Called before sleeping for a retry
    fn on_retry(&self, _attempt: u32, _delay: Duration, _error: &str) {}

    fn on_final_message(&self, _content: &str) {}
}

/// No-op notifier
pub struct NoDispatchProgress;

impl DispatchProgressNotifier for NoDispatchProgress {}
