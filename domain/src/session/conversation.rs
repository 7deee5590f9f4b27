//! Conversation session: the ordered transcript a dispatch loop works on

use super::entities::{Message, Role, SessionError};
use serde::{Deserialize, Serialize};

/// Ordered message transcript plus the cached plan of the last reasoning
/// phase.
///
/// Owned by exactly one dispatch loop at a time; concurrent chats each get
/// their own session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    messages: Vec<Message>,
    #[serde(default)]
    last_reasoning_plan: Option<String>,
}

impl ConversationSession {
    /// New session, seeded with a system message when one is given.
    pub fn new(system_instruction: Option<String>) -> Self {
        Self {
            messages: system_instruction.map(Message::system).into_iter().collect(),
            last_reasoning_plan: None,
        }
    }

    /// Rebuild a session from persisted parts.
    pub fn from_parts(messages: Vec<Message>, last_reasoning_plan: Option<String>) -> Self {
        Self {
            messages,
            last_reasoning_plan,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn system_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_system())
    }

    /// Every message except system messages, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_system())
    }

    /// The last `window` non-system messages.
    ///
    /// Leading tool messages whose assistant request fell outside the window
    /// are dropped, since providers reject unpaired tool results.
    pub fn recent_history(&self, window: usize) -> Vec<Message> {
        let history: Vec<&Message> = self.history().collect();
        let start = history.len().saturating_sub(window);
        history[start..]
            .iter()
            .skip_while(|m| m.role == Role::Tool)
            .map(|m| (*m).clone())
            .collect()
    }

    pub fn last_reasoning_plan(&self) -> Option<&str> {
        self.last_reasoning_plan.as_deref()
    }

    pub fn set_reasoning_plan(&mut self, plan: Option<String>) {
        self.last_reasoning_plan = plan;
    }

    /// Clear the conversation, keeping only the system message.
    pub fn reset(&mut self) {
        self.messages.retain(Message::is_system);
        self.messages.truncate(1);
        self.last_reasoning_plan = None;
    }

    /// Check that every assistant tool call is answered by exactly one tool
    /// message, in request order, before anything else is appended.
    pub fn verify_tool_pairing(&self) -> Result<(), SessionError> {
        let mut pending: std::collections::VecDeque<&str> = Default::default();

        for message in &self.messages {
            match message.role {
                Role::Tool => {
                    let id = message.tool_call_id.as_deref().unwrap_or_default();
                    if pending.front() == Some(&id) {
                        pending.pop_front();
                    } else {
                        return Err(SessionError::UnexpectedToolMessage { id: id.to_string() });
                    }
                }
                _ => {
                    if let Some(id) = pending.front() {
                        return Err(SessionError::UnansweredToolCall { id: id.to_string() });
                    }
                    pending.extend(message.tool_calls.iter().map(|c| c.id.as_str()));
                }
            }
        }

        match pending.front() {
            Some(id) => Err(SessionError::UnansweredToolCall { id: id.to_string() }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::ToolCallRequest;

    fn call(id: &str) -> ToolCallRequest {
        ToolCallRequest::new(id, "lookup", "{}")
    }

    #[test]
    fn test_new_seeds_system_message() {
        let session = ConversationSession::new(Some("be brief".into()));
        assert_eq!(session.len(), 1);
        assert_eq!(session.system_message().unwrap().text(), "be brief");
        assert!(ConversationSession::new(None).is_empty());
    }

    #[test]
    fn test_reset_keeps_system_and_clears_plan() {
        let mut session = ConversationSession::new(Some("sys".into()));
        session.push(Message::user("hi"));
        session.push(Message::assistant("hello"));
        session.set_reasoning_plan(Some("plan".into()));

        session.reset();

        assert_eq!(session.messages(), &[Message::system("sys")]);
        assert!(session.last_reasoning_plan().is_none());
    }

    #[test]
    fn test_recent_history_skips_system_and_orphan_tool_messages() {
        let mut session = ConversationSession::new(Some("sys".into()));
        session.push(Message::user("q"));
        session.push(Message::assistant_with_tool_calls(None, vec![call("a")]));
        session.push(Message::tool("a", "lookup", "1"));
        session.push(Message::assistant("done"));

        let window = session.recent_history(2);
        assert_eq!(window, vec![Message::assistant("done")]);

        let all = session.recent_history(40);
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], Message::user("q"));
    }

    #[test]
    fn test_pairing_accepts_answered_calls_in_order() {
        let mut session = ConversationSession::new(None);
        session.push(Message::user("q"));
        session.push(Message::assistant_with_tool_calls(None, vec![call("a"), call("b")]));
        session.push(Message::tool("a", "lookup", "1"));
        session.push(Message::tool("b", "lookup", "2"));
        session.push(Message::assistant("done"));

        assert_eq!(session.verify_tool_pairing(), Ok(()));
    }

    #[test]
    fn test_pairing_rejects_out_of_order_and_missing() {
        let mut session = ConversationSession::new(None);
        session.push(Message::assistant_with_tool_calls(None, vec![call("a"), call("b")]));
        session.push(Message::tool("b", "lookup", "2"));
        assert_eq!(
            session.verify_tool_pairing(),
            Err(SessionError::UnexpectedToolMessage { id: "b".into() })
        );

        let mut session = ConversationSession::new(None);
        session.push(Message::assistant_with_tool_calls(None, vec![call("a")]));
        session.push(Message::assistant("too early"));
        assert_eq!(
            session.verify_tool_pairing(),
            Err(SessionError::UnansweredToolCall { id: "a".into() })
        );

        let mut session = ConversationSession::new(None);
        session.push(Message::assistant_with_tool_calls(None, vec![call("a")]));
        assert!(session.verify_tool_pairing().is_err());
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let mut session = ConversationSession::new(Some("sys".into()));
        session.push(Message::user("q"));
        session.push(Message::assistant_with_tool_calls(Some("checking".into()), vec![call("a")]));
        session.push(Message::tool("a", "lookup", "{\"temp\":72}"));
        session.set_reasoning_plan(Some("1. look up".into()));

        let json = serde_json::to_string(&session).unwrap();
        let back: ConversationSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
