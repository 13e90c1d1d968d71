//! Core state machine types.
//!
//! This module contains the data model shared by every machine:
//! - State identity via the `StateKey` trait
//! - Per-state callback bundles (`StateRecord`)
//! - Bounded transition history

mod history;
mod key;
mod record;

pub use history::{StateHistory, StateTransition};
pub use key::StateKey;
pub use record::{EnterFn, ExitFn, StateRecord, TickFn};
