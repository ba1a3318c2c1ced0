//! Reply pipeline state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions: the
//! transition function decides the next stage and the effects (suspensions,
//! notifications, appends) that the runtime carries out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ConvContext, ConvState, PendingReply};
pub use transition::{transition, TransitionError, TransitionResult};
