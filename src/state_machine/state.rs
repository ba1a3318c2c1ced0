//! Conversation state types

use crate::persona::Persona;
use crate::store::ToolInvocation;
use serde::{Deserialize, Serialize};

/// A reply that has been composed and is being typed out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReply {
    pub text: String,
    pub tools: Vec<ToolInvocation>,
}

impl PendingReply {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// The first `revealed` characters of the reply
    pub fn partial(&self, revealed: usize) -> String {
        self.text.chars().take(revealed).collect()
    }
}

/// Stage of the reply pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Ready for user input, no reply pending
    #[default]
    Idle,

    /// User message received, agent is "thinking"
    Thinking { user_text: String },

    /// Tools fired and are "running"
    ExecutingTools {
        user_text: String,
        tools: Vec<ToolInvocation>,
    },

    /// Reply composed, being revealed character by character
    Revealing {
        reply: PendingReply,
        /// Characters revealed so far
        revealed: usize,
    },
}

impl ConvState {
    /// Check if a reply is in flight
    pub fn is_working(&self) -> bool {
        !matches!(self, ConvState::Idle)
    }

    pub fn is_thinking(&self) -> bool {
        matches!(self, ConvState::Thinking { .. })
    }

    /// Text typed so far while revealing
    pub fn typing_text(&self) -> Option<String> {
        match self {
            ConvState::Revealing { reply, revealed } => Some(reply.partial(*revealed)),
            _ => None,
        }
    }

    /// Stable name used in notifications
    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::Thinking { .. } => "thinking",
            ConvState::ExecutingTools { .. } => "executing_tools",
            ConvState::Revealing { .. } => "typing",
        }
    }
}

/// Context for a conversation (immutable for the life of one reply)
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub conversation_id: String,
    pub persona: Persona,
}

impl ConvContext {
    pub fn new(conversation_id: impl Into<String>, persona: Persona) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            persona,
        }
    }
}
