//! Builder API for ergonomic state registration.
//!
//! This module provides the fluent [`StateBuilder`] used to assemble
//! per-state callback bundles, and the [`state_key!`](crate::state_key)
//! macro for declaring key enums with a sentinel variant.

pub mod macros;
pub mod record;

pub use record::StateBuilder;
