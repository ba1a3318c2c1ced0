//! Runtime for executing the reply pipeline
//!
//! Owns the store, the pipeline state and the injected collaborators
//! (random source, timer). One runtime serves one session; nothing is global.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;
pub use traits::*;

use crate::config::SimConfig;
use crate::persona::PersonaTable;
use crate::random::StdRandom;
use crate::state_machine::TransitionError;
use crate::store::{ConversationStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = ConversationRuntime<StdRandom, TokioTimer>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Ids of the messages produced by one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub user_message_id: String,
    pub agent_message_id: String,
}

impl ProductionRuntime {
    /// Build a runtime for the built-in personas from environment configuration
    pub fn from_config(config: &SimConfig) -> Self {
        let store = ConversationStore::new(Arc::new(PersonaTable::builtin()));
        let mut runtime = ConversationRuntime::new(
            store,
            StdRandom::from_seed(config.seed),
            TokioTimer::new(config.speedup),
        );
        if let Some(persona_id) = &config.persona {
            runtime.select_persona(persona_id);
        }
        runtime
    }
}
