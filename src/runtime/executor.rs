//! Conversation runtime executor

use super::traits::Timer;
use super::{RuntimeError, SubmitOutcome};

use crate::events::SessionEvent;
use crate::persona::Persona;
use crate::random::RandomSource;
use crate::state_machine::{transition, ConvContext, ConvState, Effect, Event};
use crate::store::{ConversationStore, LogSnapshot, Message, StoreError};
use std::ops::{Deref, DerefMut};
use tokio::sync::broadcast;

/// Generic conversation runtime that can work with any random source and timer
pub struct ConversationRuntime<R, T>
where
    R: RandomSource,
    T: Timer,
{
    store: ConversationStore,
    state: ConvState,
    random: R,
    timer: T,
    broadcast_tx: broadcast::Sender<SessionEvent>,
}

impl<R, T> ConversationRuntime<R, T>
where
    R: RandomSource,
    T: Timer,
{
    pub fn new(store: ConversationStore, random: R, timer: T) -> Self {
        let broadcast_tx = store.event_sender();
        Self {
            store,
            state: ConvState::Idle,
            random,
            timer,
            broadcast_tx,
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn state(&self) -> &ConvState {
        &self.state
    }

    pub fn select_persona(&mut self, persona_id: &str) -> Option<&Persona> {
        self.store.select_persona(persona_id)
    }

    pub fn active_persona(&self) -> Option<&Persona> {
        self.store.active_persona()
    }

    pub fn log(&self) -> LogSnapshot {
        self.store.log()
    }

    /// Whether the pipeline is in its think stage.
    ///
    /// `submit_user_text` holds `&mut self` until the reply is in the log, so
    /// between calls this is always `false`. Observers that need the live
    /// flag follow `SessionEvent::StateChange` from [`subscribe`](Self::subscribe).
    pub fn is_thinking(&self) -> bool {
        self.state.is_thinking()
    }

    /// Reply text typed so far; `None` between calls for the same reason as
    /// [`is_thinking`](Self::is_thinking). Live progress arrives as
    /// `SessionEvent::Typing`.
    pub fn typing_text(&self) -> Option<String> {
        self.state.typing_text()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Append `text` as a user message and run the reply pipeline to completion.
    ///
    /// The user message is appended before the first suspension; observers see
    /// it immediately. Returns once the agent reply is in the log. If the
    /// returned future is dropped early, or the pipeline fails, the runtime goes
    /// back to idle and the user message stays in the log without a reply.
    pub async fn submit_user_text(&mut self, text: &str) -> Result<SubmitOutcome, RuntimeError> {
        if self.state.is_working() {
            return Err(crate::state_machine::TransitionError::AgentBusy.into());
        }

        let context = self.context()?;
        let user_message_id = self.store.append_user_message(text)?;
        tracing::info!(
            conv_id = %context.conversation_id,
            persona_id = %context.persona.id,
            message_id = %user_message_id,
            "User message accepted"
        );

        let agent_message_id = {
            let mut pipeline = PipelineGuard {
                runtime: &mut *self,
            };
            pipeline
                .process_event(
                    &context,
                    Event::UserMessage {
                        message_id: user_message_id.clone(),
                        text: text.to_string(),
                    },
                )
                .await?
        };

        let agent_message_id = agent_message_id.ok_or_else(|| {
            StoreError::InvalidState("reply pipeline finished without a reply".to_string())
        })?;

        Ok(SubmitOutcome {
            user_message_id,
            agent_message_id,
        })
    }

    fn context(&self) -> Result<ConvContext, StoreError> {
        let conversation = self
            .store
            .active_conversation()
            .ok_or_else(|| StoreError::InvalidState("no persona selected".to_string()))?;
        let persona = self
            .store
            .active_persona()
            .ok_or_else(|| StoreError::UnknownPersona(conversation.persona_id.clone()))?;
        Ok(ConvContext::new(conversation.id.clone(), persona.clone()))
    }

    /// Drive events through the state machine until no effect produces another
    async fn process_event(
        &mut self,
        context: &ConvContext,
        event: Event,
    ) -> Result<Option<String>, RuntimeError> {
        let mut events_to_process = vec![event];
        let mut agent_message_id = None;

        while let Some(current_event) = events_to_process.pop() {
            // Pure state transition
            let result = match transition(&self.state, context, current_event, &mut self.random)
            {
                Ok(r) => r,
                Err(e) => {
                    let _ = self.broadcast_tx.send(SessionEvent::Error {
                        message: e.to_string(),
                    });
                    return Err(e.into());
                }
            };

            let old_state = std::mem::replace(&mut self.state, result.new_state);
            if old_state.name() != self.state.name() {
                tracing::debug!(
                    conv_id = %context.conversation_id,
                    from = old_state.name(),
                    to = self.state.name(),
                    "State transition"
                );
            }

            // Execute effects and collect generated events
            for effect in result.effects {
                match self.execute_effect(context, effect).await? {
                    EffectOutcome::Event(next) => events_to_process.push(next),
                    EffectOutcome::Appended(id) => agent_message_id = Some(id),
                    EffectOutcome::Done => {}
                }
            }
        }

        Ok(agent_message_id)
    }

    async fn execute_effect(
        &mut self,
        context: &ConvContext,
        effect: Effect,
    ) -> Result<EffectOutcome, RuntimeError> {
        match effect {
            Effect::Suspend { delay, then } => {
                self.timer.sleep(delay).await;
                Ok(EffectOutcome::Event(then))
            }

            Effect::PersistAgentMessage {
                text,
                tools,
                reasoning,
            } => {
                let tool_count = tools.len();
                let message = Message::agent(&context.persona.id, text)
                    .with_tools(tools)
                    .with_reasoning(reasoning);
                let id = self.store.append_agent_message(message)?;
                tracing::info!(
                    conv_id = %context.conversation_id,
                    message_id = %id,
                    tool_count,
                    "Agent reply appended"
                );
                Ok(EffectOutcome::Appended(id))
            }

            Effect::NotifyClient(event) => {
                // No subscribers is fine
                let _ = self.broadcast_tx.send(event);
                Ok(EffectOutcome::Done)
            }
        }
    }
}

enum EffectOutcome {
    Event(Event),
    Appended(String),
    Done,
}

/// Puts the runtime back to `Idle` when a pipeline ends anywhere but `Idle`,
/// whether it was dropped at a suspension or stopped on an error.
struct PipelineGuard<'a, R, T>
where
    R: RandomSource,
    T: Timer,
{
    runtime: &'a mut ConversationRuntime<R, T>,
}

impl<R, T> Deref for PipelineGuard<'_, R, T>
where
    R: RandomSource,
    T: Timer,
{
    type Target = ConversationRuntime<R, T>;

    fn deref(&self) -> &Self::Target {
        self.runtime
    }
}

impl<R, T> DerefMut for PipelineGuard<'_, R, T>
where
    R: RandomSource,
    T: Timer,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.runtime
    }
}

impl<R, T> Drop for PipelineGuard<'_, R, T>
where
    R: RandomSource,
    T: Timer,
{
    fn drop(&mut self) {
        let runtime = &mut *self.runtime;
        if !runtime.state.is_working() {
            return;
        }
        tracing::warn!(
            state = runtime.state.name(),
            "Reply pipeline abandoned, returning to idle"
        );
        runtime.state = ConvState::Idle;
        let _ = runtime.broadcast_tx.send(SessionEvent::Error {
            message: "reply abandoned before completion".to_string(),
        });
        let _ = runtime.broadcast_tx.send(SessionEvent::StateChange {
            state: ConvState::Idle.name().to_string(),
        });
    }
}
