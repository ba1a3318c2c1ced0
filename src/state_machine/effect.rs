//! Effects produced by state transitions

use crate::events::SessionEvent;
use crate::state_machine::event::Event;
use crate::store::ToolInvocation;
use std::time::Duration;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Suspend for `delay`, then feed `then` back into the machine
    Suspend { delay: Duration, then: Event },

    /// Append the finished agent message to the store
    PersistAgentMessage {
        text: String,
        tools: Vec<ToolInvocation>,
        reasoning: String,
    },

    /// Notify subscribed observers
    NotifyClient(SessionEvent),
}

impl Effect {
    pub fn suspend(delay: Duration, then: Event) -> Self {
        Effect::Suspend { delay, then }
    }

    pub fn notify_state_change(state: &str) -> Self {
        Effect::NotifyClient(SessionEvent::StateChange {
            state: state.to_string(),
        })
    }

    pub fn notify_typing(partial: String) -> Self {
        Effect::NotifyClient(SessionEvent::Typing { partial })
    }

    pub fn notify_tools_executed(count: usize) -> Self {
        Effect::NotifyClient(SessionEvent::ToolsExecuted { count })
    }

    pub fn notify_agent_done() -> Self {
        Effect::NotifyClient(SessionEvent::AgentDone)
    }
}
