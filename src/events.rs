//! Events broadcast to observers of a session

use crate::store::Message;
use serde::Serialize;

/// Everything a rendering layer needs to stay in sync with a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A fresh conversation was started for a persona
    PersonaSelected {
        persona_id: String,
        conversation_id: String,
    },
    /// A message was appended to the active conversation
    Message { message: Message },
    /// The reply pipeline moved to a new stage
    StateChange { state: String },
    /// Reveal progress: the reply text typed so far
    Typing { partial: String },
    /// A reply finished that used at least one tool
    ToolsExecuted { count: usize },
    /// The agent finished replying
    AgentDone,
    Error { message: String },
}
