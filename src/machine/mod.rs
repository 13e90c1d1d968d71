//! The state machine and its collaborators.
//!
//! # Key Concepts
//!
//! - **Registry**: states are registered once under a unique key
//! - **Transitions**: `set_state` runs exit, swap, notify, enter, in that order
//! - **Error sink**: invalid operations are reported, never raised
//! - **Target**: an optional context value forwarded to every callback

pub mod config;
mod error;
mod listeners;
#[allow(clippy::module_inception)]
mod machine;
pub mod sink;

pub use config::{MachineConfig, MachineConfigBuilder, DEFAULT_HISTORY_LIMIT};
pub use error::StateError;
pub use listeners::SubscriptionId;
pub use machine::{StateMachine, WeakStateMachine};
