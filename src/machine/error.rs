//! Errors reported by state machines.

use crate::core::StateKey;
use thiserror::Error;

/// Invalid registrations and transitions.
///
/// Machines do not return these from their infallible APIs. They render them
/// with `Display` and pass the message to the error sink instead.
/// [`StateMachine::try_add_state`](crate::StateMachine::try_add_state)
/// returns them directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError<K: StateKey> {
    #[error("The default state must be empty! It is reserved for \"no active state\"")]
    ReservedKey,

    #[error("State {key:?} is already registered")]
    DuplicateKey { key: K },

    #[error("State {key:?} is not defined!")]
    UndefinedState { key: K },
}
