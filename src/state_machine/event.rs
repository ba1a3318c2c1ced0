//! Events that can occur in a conversation

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    UserMessage { message_id: String, text: String },

    // Timer events
    ThinkElapsed,
    ToolsComplete,
    RevealTick,
}
