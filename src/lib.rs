//! Agent chat simulator
//!
//! A conversation engine for a set of fixed "agent" personas. Replies are
//! simulated: canned templates picked by keyword and specialty, staged through
//! think / tool / typing delays driven by an explicit state machine.

pub mod activity;
pub mod config;
pub mod events;
pub mod persona;
pub mod random;
pub mod runtime;
pub mod simulator;
pub mod state_machine;
pub mod store;

pub use config::SimConfig;
pub use events::SessionEvent;
pub use persona::{Availability, Persona, PersonaTable, Specialty};
pub use runtime::{ConversationRuntime, ProductionRuntime, RuntimeError, SubmitOutcome};
pub use store::{ConversationStore, Message, MessageRole, StoreError, ToolInvocation};
