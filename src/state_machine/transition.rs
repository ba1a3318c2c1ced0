//! Transition function for the reply pipeline
//!
//! Idle -> Thinking -> (ExecutingTools) -> Revealing -> Idle
//!
//! Given the same state, event and random draws the result is always the
//! same; all timing and I/O is expressed as effects.

use super::{ConvContext, ConvState, Effect, Event, PendingReply};
use crate::random::RandomSource;
use crate::simulator::{
    compose_reply, detect_tools, reasoning_annotation, reveal_delay, think_delay,
    TOOL_EXECUTION_DELAY,
};
use crate::store::ToolInvocation;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Agent is busy, cannot accept message until the current reply finishes")]
    AgentBusy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
    random: &mut dyn RandomSource,
) -> Result<TransitionResult, TransitionError> {
    let specialty = context.persona.specialty;

    match (state, event) {
        // Idle + UserMessage -> Thinking
        (ConvState::Idle, Event::UserMessage { text, .. }) => {
            let delay = think_delay(&text);
            let next = ConvState::Thinking { user_text: text };
            Ok(TransitionResult::new(next)
                .with_effect(Effect::notify_state_change("thinking"))
                .with_effect(Effect::suspend(delay, Event::ThinkElapsed)))
        }

        (_, Event::UserMessage { .. }) => Err(TransitionError::AgentBusy),

        // Thinking + ThinkElapsed -> ExecutingTools, or straight to Revealing
        (ConvState::Thinking { user_text }, Event::ThinkElapsed) => {
            let tools = detect_tools(user_text, specialty, random);
            if tools.is_empty() {
                Ok(begin_reveal(user_text, tools, context, random))
            } else {
                Ok(TransitionResult::new(ConvState::ExecutingTools {
                    user_text: user_text.clone(),
                    tools,
                })
                .with_effect(Effect::notify_state_change("executing_tools"))
                .with_effect(Effect::suspend(TOOL_EXECUTION_DELAY, Event::ToolsComplete)))
            }
        }

        // ExecutingTools + ToolsComplete -> Revealing
        (ConvState::ExecutingTools { user_text, tools }, Event::ToolsComplete) => {
            Ok(begin_reveal(user_text, tools.clone(), context, random))
        }

        // Revealing + RevealTick -> Revealing (next char) or Idle (done).
        // One tick per character; there is no tick for the empty prefix.
        (ConvState::Revealing { reply, revealed }, Event::RevealTick) => {
            let revealed = (*revealed + 1).min(reply.char_count());
            if revealed >= reply.char_count() {
                Ok(TransitionResult::new(ConvState::Idle)
                    .with_effect(Effect::notify_typing(reply.text.clone()))
                    .with_effects(finish(reply.clone(), context)))
            } else {
                Ok(TransitionResult::new(ConvState::Revealing {
                    reply: reply.clone(),
                    revealed,
                })
                .with_effect(Effect::notify_typing(reply.partial(revealed)))
                .with_effect(Effect::suspend(reveal_delay(random), Event::RevealTick)))
            }
        }

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}

/// Compose the reply and start typing it out
fn begin_reveal(
    user_text: &str,
    tools: Vec<ToolInvocation>,
    context: &ConvContext,
    random: &mut dyn RandomSource,
) -> TransitionResult {
    let text = compose_reply(user_text, context.persona.specialty, random);
    let reply = PendingReply { text, tools };

    if reply.char_count() == 0 {
        return TransitionResult::new(ConvState::Idle).with_effects(finish(reply, context));
    }

    TransitionResult::new(ConvState::Revealing { reply, revealed: 0 })
        .with_effect(Effect::notify_state_change("typing"))
        .with_effect(Effect::suspend(reveal_delay(random), Event::RevealTick))
}

/// Effects that finalize a reply: append it, then tell observers we are done
fn finish(reply: PendingReply, context: &ConvContext) -> Vec<Effect> {
    let tool_count = reply.tools.len();
    let mut effects = vec![
        Effect::PersistAgentMessage {
            text: reply.text,
            tools: reply.tools,
            reasoning: reasoning_annotation(context.persona.specialty),
        },
        Effect::notify_state_change("idle"),
    ];
    if tool_count > 0 {
        effects.push(Effect::notify_tools_executed(tool_count));
    }
    effects.push(Effect::notify_agent_done());
    effects
}
