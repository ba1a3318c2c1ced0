//! In-memory conversation store
//!
//! Holds the message log of the active persona. Logs are never persisted;
//! switching persona archives the current conversation and starts a new one.

mod message;

pub use message::*;

use crate::events::SessionEvent;
use crate::persona::{Persona, PersonaTable};
use chrono::{DateTime, Utc};
use std::ops::Deref;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

/// Room for every event of the longest possible reply (one typing event per
/// character) with headroom for a subscriber that drains afterwards
const EVENT_CAPACITY: usize = 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Unknown persona: {0}")]
    UnknownPersona(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only view of a conversation log.
///
/// Cloning is cheap; later appends to the store do not affect a snapshot.
#[derive(Debug, Clone, Default)]
pub struct LogSnapshot(Arc<Vec<Message>>);

impl Deref for LogSnapshot {
    type Target = [Message];

    fn deref(&self) -> &[Message] {
        &self.0
    }
}

/// Ordered messages exchanged with exactly one persona
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: String,
    pub persona_id: String,
    pub created_at: DateTime<Utc>,
    messages: Arc<Vec<Message>>,
}

impl Conversation {
    fn start(persona: &Persona) -> Self {
        let mut conversation = Self {
            id: uuid::Uuid::new_v4().to_string(),
            persona_id: persona.id.clone(),
            created_at: Utc::now(),
            messages: Arc::new(Vec::new()),
        };
        conversation.push(Message::agent(&persona.id, persona.greeting()));
        conversation
    }

    pub fn messages(&self) -> LogSnapshot {
        LogSnapshot(Arc::clone(&self.messages))
    }

    fn push(&mut self, mut message: Message) -> &Message {
        // Copy-on-write: outstanding snapshots keep the old vector
        let messages = Arc::make_mut(&mut self.messages);
        message.sequence_id = messages.len() as u64 + 1;
        messages.push(message);
        &messages[messages.len() - 1]
    }
}

/// Store for the active conversation and the archive of previous ones
pub struct ConversationStore {
    personas: Arc<PersonaTable>,
    active: Option<Conversation>,
    archived: Vec<Conversation>,
    events: broadcast::Sender<SessionEvent>,
}

impl ConversationStore {
    pub fn new(personas: Arc<PersonaTable>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            personas,
            active: None,
            archived: Vec::new(),
            events,
        }
    }

    pub fn personas(&self) -> &PersonaTable {
        &self.personas
    }

    /// Make `persona_id` the active persona.
    ///
    /// Starting a conversation seeds it with the persona's greeting. Unknown
    /// ids are ignored and `None` is returned.
    pub fn select_persona(&mut self, persona_id: &str) -> Option<&Persona> {
        let Some(persona) = self.personas.get(persona_id) else {
            tracing::warn!(persona_id = %persona_id, "Ignoring selection of unknown persona");
            return None;
        };

        let already_active = self
            .active
            .as_ref()
            .is_some_and(|c| c.persona_id == persona.id);

        if !already_active {
            let conversation = Conversation::start(persona);
            tracing::info!(
                persona_id = %persona.id,
                conversation_id = %conversation.id,
                "Starting conversation"
            );

            let _ = self.events.send(SessionEvent::PersonaSelected {
                persona_id: persona.id.clone(),
                conversation_id: conversation.id.clone(),
            });
            for message in conversation.messages.iter() {
                let _ = self.events.send(SessionEvent::Message {
                    message: message.clone(),
                });
            }

            if let Some(previous) = self.active.replace(conversation) {
                self.archived.push(previous);
            }
        }

        self.personas.get(persona_id)
    }

    /// Like [`select_persona`](Self::select_persona) but reports unknown ids
    pub fn try_select_persona(&mut self, persona_id: &str) -> StoreResult<&Persona> {
        if self.personas.get(persona_id).is_none() {
            return Err(StoreError::UnknownPersona(persona_id.to_string()));
        }
        self.select_persona(persona_id)
            .ok_or_else(|| StoreError::UnknownPersona(persona_id.to_string()))
    }

    pub fn active_persona(&self) -> Option<&Persona> {
        self.active
            .as_ref()
            .and_then(|c| self.personas.get(&c.persona_id))
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active.as_ref()
    }

    /// Conversations replaced by a persona switch, oldest first
    pub fn archived(&self) -> &[Conversation] {
        &self.archived
    }

    /// Append a user message and return its id
    pub fn append_user_message(&mut self, text: &str) -> StoreResult<String> {
        if text.trim().is_empty() {
            return Err(StoreError::InvalidState("message text is empty".to_string()));
        }
        self.append(Message::user(text))
    }

    /// Append a finished agent message and return its id
    pub fn append_agent_message(&mut self, message: Message) -> StoreResult<String> {
        if message.role != MessageRole::Agent {
            return Err(StoreError::InvalidState(format!(
                "expected an agent message, got role {}",
                message.role
            )));
        }
        self.append(message)
    }

    fn append(&mut self, message: Message) -> StoreResult<String> {
        if !message.is_well_formed() {
            return Err(StoreError::InvalidState(
                "user messages cannot carry tool invocations or reasoning".to_string(),
            ));
        }
        let conversation = self
            .active
            .as_mut()
            .ok_or_else(|| StoreError::InvalidState("no persona selected".to_string()))?;

        let conversation_id = conversation.id.clone();
        let stored = conversation.push(message);
        tracing::debug!(
            conversation_id = %conversation_id,
            message_id = %stored.message_id,
            role = %stored.role,
            "Appended message"
        );
        let id = stored.message_id.clone();
        let _ = self.events.send(SessionEvent::Message {
            message: stored.clone(),
        });
        Ok(id)
    }

    /// Current log of the active conversation (empty when none)
    pub fn log(&self) -> LogSnapshot {
        self.active
            .as_ref()
            .map(Conversation::messages)
            .unwrap_or_default()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Sender shared with the runtime so observers see one ordered stream
    pub fn event_sender(&self) -> broadcast::Sender<SessionEvent> {
        self.events.clone()
    }
}
