//! Per-state callback bundles.
//!
//! A [`StateRecord`] pairs a state's key with up to three lifecycle
//! callbacks and an opaque payload. Records are created by registering a
//! [`StateBuilder`](crate::builder::StateBuilder) with a machine and are
//! immutable from then on.

use super::key::StateKey;
use std::any::Any;
use std::fmt;

/// Callback run when a state becomes active. Receives the previous key.
pub type EnterFn<K, T> = Box<dyn Fn(&T, &K)>;

/// Callback run on every tick while a state is active. Receives delta time.
pub type TickFn<T> = Box<dyn Fn(&T, f32)>;

/// Callback run when a state stops being active. Receives the next key.
pub type ExitFn<K, T> = Box<dyn Fn(&T, &K)>;

/// A registered state: identity key, optional callbacks and a user payload.
///
/// `T` is the target context forwarded to every callback; it is `()` for
/// machines without a target.
///
/// Records are shared as `Rc<StateRecord<K, T>>`. Two records with equal
/// keys are still distinct objects; compare with [`std::rc::Rc::ptr_eq`]
/// when identity matters.
pub struct StateRecord<K: StateKey, T = ()> {
    key: K,
    on_enter: Option<EnterFn<K, T>>,
    on_tick: Option<TickFn<T>>,
    on_exit: Option<ExitFn<K, T>>,
    user_data: Option<Box<dyn Any>>,
}

impl<K: StateKey, T> StateRecord<K, T> {
    pub(crate) fn new(
        key: K,
        on_enter: Option<EnterFn<K, T>>,
        on_tick: Option<TickFn<T>>,
        on_exit: Option<ExitFn<K, T>>,
        user_data: Option<Box<dyn Any>>,
    ) -> Self {
        Self {
            key,
            on_enter,
            on_tick,
            on_exit,
            user_data,
        }
    }

    /// The "no active state" record: sentinel key, no callbacks.
    pub(crate) fn none() -> Self {
        Self::new(K::none(), None, None, None, None)
    }

    /// The key this record was registered under.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Check if this is the sentinel "none" record.
    pub fn is_none(&self) -> bool {
        self.key.is_none()
    }

    /// Check if an enter callback is set.
    pub fn has_on_enter(&self) -> bool {
        self.on_enter.is_some()
    }

    /// Check if a tick callback is set.
    pub fn has_on_tick(&self) -> bool {
        self.on_tick.is_some()
    }

    /// Check if an exit callback is set.
    pub fn has_on_exit(&self) -> bool {
        self.on_exit.is_some()
    }

    /// Borrow the attached payload if it has type `U`.
    pub fn user_data<U: Any>(&self) -> Option<&U> {
        self.user_data.as_deref()?.downcast_ref::<U>()
    }

    /// Check if any payload is attached, regardless of its type.
    pub fn has_user_data(&self) -> bool {
        self.user_data.is_some()
    }

    pub(crate) fn enter(&self, target: &T, prev: &K) {
        if let Some(on_enter) = &self.on_enter {
            on_enter(target, prev);
        }
    }

    pub(crate) fn tick(&self, target: &T, delta_time: f32) {
        if let Some(on_tick) = &self.on_tick {
            on_tick(target, delta_time);
        }
    }

    pub(crate) fn exit(&self, target: &T, next: &K) {
        if let Some(on_exit) = &self.on_exit {
            on_exit(target, next);
        }
    }
}

impl<K: StateKey, T> fmt::Debug for StateRecord<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRecord")
            .field("key", &self.key)
            .field("on_enter", &self.has_on_enter())
            .field("on_tick", &self.has_on_tick())
            .field("on_exit", &self.has_on_exit())
            .field("user_data", &self.has_user_data())
            .finish()
    }
}
