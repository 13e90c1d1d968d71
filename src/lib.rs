//! Statecraft: a callback-driven finite state machine
//!
//! Statecraft lets host code (game objects, UI widgets, session handlers)
//! register named states, each with optional enter, tick and exit callbacks,
//! and drive transitions between them. The machine never acts on its own:
//! the host calls [`StateMachine::update`] from its loop and
//! [`StateMachine::set_state`] whenever it wants a transition.
//!
//! # Core Concepts
//!
//! - **Keys**: any `Clone + Eq + Hash + Debug + Default` type; the default
//!   value is reserved for "no active state"
//! - **Records**: per-state callback bundles built with [`StateBuilder`]
//! - **Targets**: an optional context forwarded to every callback, so one
//!   machine can drive a separate object
//! - **Error sink**: invalid registrations and transitions are reported to an
//!   injected `Fn(&str)` instead of failing
//!
//! # Example
//!
//! ```rust
//! use statecraft::{state_key, StateBuilder, StateMachine};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! state_key! {
//!     enum Player {
//!         Idle,
//!         Running,
//!     }
//! }
//!
//! let distance = Rc::new(Cell::new(0.0_f32));
//! let machine = StateMachine::new(statecraft::sink::tracing_sink());
//!
//! machine.add_state(Player::Idle, StateBuilder::new());
//! let odometer = distance.clone();
//! machine.add_state(
//!     Player::Running,
//!     StateBuilder::new().with_on_tick(move |dt| odometer.set(odometer.get() + 4.0 * dt)),
//! );
//!
//! machine.set_state(Player::Running);
//! machine.update(0.5);
//! machine.set_state(Player::Idle);
//! machine.update(0.5);
//!
//! assert_eq!(distance.get(), 2.0);
//! assert_eq!(machine.history().len(), 2);
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use crate::builder::StateBuilder;
pub use crate::core::{StateHistory, StateKey, StateRecord, StateTransition};
pub use crate::machine::{
    sink, MachineConfig, StateError, StateMachine, SubscriptionId, WeakStateMachine,
};
