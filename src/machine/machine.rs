//! Callback-driven state machine.

use crate::builder::StateBuilder;
use crate::core::{
    EnterFn, ExitFn, StateHistory, StateKey, StateRecord, StateTransition, TickFn,
};
use crate::machine::config::MachineConfig;
use crate::machine::error::StateError;
use crate::machine::listeners::{Listeners, SubscriptionId};
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

struct Inner<K: StateKey, T> {
    target: T,
    registry: RefCell<HashMap<K, Rc<StateRecord<K, T>>>>,
    none: Rc<StateRecord<K, T>>,
    current: RefCell<Rc<StateRecord<K, T>>>,
    listeners: RefCell<Listeners<K, T>>,
    history: RefCell<StateHistory<K>>,
    error_sink: Box<dyn Fn(&str)>,
    config: MachineConfig,
}

/// State machine that runs per-state callbacks on transitions and ticks.
///
/// `K` identifies states; `K::default()` is reserved for "no active state".
/// `T` is an optional target forwarded to every callback; machines built with
/// [`StateMachine::new`] use `T = ()`.
///
/// `StateMachine` is a cheap-to-clone handle: clones drive the same machine.
/// No internal borrow is held while a callback, listener or the error sink
/// runs, so any of them may call back into the machine. Callbacks stored in
/// the machine should capture a [`WeakStateMachine`] rather than a clone, to
/// avoid a reference cycle.
///
/// The machine is single-threaded (`!Send`, `!Sync`) and never acts on its
/// own: every transition and tick is caller-initiated.
///
/// # Example
///
/// ```rust
/// use statecraft::{StateBuilder, StateMachine};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
/// enum Door {
///     #[default]
///     None,
///     Open,
///     Closed,
/// }
///
/// let machine = StateMachine::new(|message: &str| eprintln!("{message}"));
/// machine.add_state(Door::Open, StateBuilder::new());
/// machine.add_state(
///     Door::Closed,
///     StateBuilder::new().with_on_enter(|prev: &Door| println!("closed after {prev:?}")),
/// );
///
/// assert!(machine.set_state(Door::Open));
/// assert!(!machine.set_state(Door::Open));
/// assert!(machine.set_state(Door::Closed));
/// assert_eq!(machine.current_key(), Door::Closed);
/// ```
pub struct StateMachine<K: StateKey, T = ()> {
    inner: Rc<Inner<K, T>>,
}

/// Non-owning handle to a [`StateMachine`], for use inside its callbacks.
pub struct WeakStateMachine<K: StateKey, T = ()> {
    inner: Weak<Inner<K, T>>,
}

impl<K: StateKey> StateMachine<K, ()> {
    /// Create a machine without a target.
    ///
    /// `error_sink` receives a message for every invalid registration or
    /// transition attempt.
    pub fn new<F>(error_sink: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        Self::with_target((), error_sink)
    }

    /// Create a machine without a target, using `config`.
    pub fn with_config<F>(config: MachineConfig, error_sink: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        Self::with_target_and_config((), config, error_sink)
    }
}

impl<K: StateKey, T: 'static> StateMachine<K, T> {
    /// Create a machine that forwards `target` to every callback.
    pub fn with_target<F>(target: T, error_sink: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        Self::with_target_and_config(target, MachineConfig::default(), error_sink)
    }

    /// Create a machine with a target and explicit configuration.
    pub fn with_target_and_config<F>(target: T, config: MachineConfig, error_sink: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        let none = Rc::new(StateRecord::none());
        Self {
            inner: Rc::new(Inner {
                target,
                registry: RefCell::new(HashMap::new()),
                current: RefCell::new(Rc::clone(&none)),
                none,
                listeners: RefCell::new(Listeners::new()),
                history: RefCell::new(StateHistory::with_limit(config.history_limit())),
                error_sink: Box::new(error_sink),
                config,
            }),
        }
    }

    /// Register a state under `key`.
    ///
    /// Returns the registered record. If `key` is the sentinel
    /// `K::default()`, the error sink is notified, nothing is registered and
    /// `None` is returned.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already registered. Registering a key twice is a
    /// bug in the host's setup code; use [`try_add_state`](Self::try_add_state)
    /// when keys come from runtime data.
    pub fn add_state(&self, key: K, builder: StateBuilder<K, T>) -> Option<Rc<StateRecord<K, T>>> {
        match self.try_add_state(key, builder) {
            Ok(record) => Some(record),
            Err(err @ StateError::DuplicateKey { .. }) => panic!("{err}"),
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    /// Register a state from individually supplied, already boxed callbacks.
    ///
    /// Same contract as [`add_state`](Self::add_state), including the panic
    /// on duplicate keys. Prefer [`StateBuilder`] with `add_state` when
    /// writing closures inline: the builder boxes them and infers their
    /// argument types. This form suits callbacks that are already stored as
    /// [`EnterFn`], [`TickFn`] or [`ExitFn`] values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statecraft::core::{EnterFn, TickFn};
    /// use statecraft::StateMachine;
    ///
    /// let machine: StateMachine<u8> = StateMachine::new(|_: &str| {});
    /// let on_enter: EnterFn<u8, ()> = Box::new(|_: &(), prev: &u8| println!("entered from {prev}"));
    /// let on_tick: Option<TickFn<()>> = None;
    ///
    /// let record = machine.add_state_with(1, Some(on_enter), on_tick, None).unwrap();
    /// assert!(record.has_on_enter());
    /// assert!(!record.has_on_tick());
    /// ```
    pub fn add_state_with(
        &self,
        key: K,
        on_enter: Option<EnterFn<K, T>>,
        on_tick: Option<TickFn<T>>,
        on_exit: Option<ExitFn<K, T>>,
    ) -> Option<Rc<StateRecord<K, T>>> {
        self.add_state(key, StateBuilder::from_parts(on_enter, on_tick, on_exit))
    }

    /// Register a state, returning registration failures instead of
    /// reporting or panicking.
    ///
    /// The error sink is not called.
    pub fn try_add_state(
        &self,
        key: K,
        builder: StateBuilder<K, T>,
    ) -> Result<Rc<StateRecord<K, T>>, StateError<K>> {
        if key.is_none() {
            return Err(StateError::ReservedKey);
        }

        let mut registry = self.inner.registry.borrow_mut();
        match registry.entry(key) {
            Entry::Occupied(entry) => Err(StateError::DuplicateKey {
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                trace!(machine = self.label(), state = ?entry.key(), "state registered");
                let record = Rc::new(builder.build(entry.key().clone()));
                entry.insert(Rc::clone(&record));
                Ok(record)
            }
        }
    }

    /// Transition to the state registered under `key`.
    ///
    /// Returns `true` if a transition was committed. Returns `false` without
    /// running any callback if `key` is already current, or after reporting
    /// to the error sink if `key` is not registered.
    ///
    /// A committed transition runs, in order: the current state's exit
    /// callback, the swap of the current state, the state change listeners,
    /// and the new state's enter callback. Callback panics propagate to the
    /// caller and are not rolled back: once the exit callback has run, the
    /// swap may already be visible.
    pub fn set_state(&self, key: K) -> bool {
        self.resolve_state(key).is_some()
    }

    /// Transition like [`set_state`](Self::set_state), returning the resolved
    /// record.
    ///
    /// Returns `None` if nothing was committed. The returned record is the
    /// one this call switched to; it may no longer be current if its enter
    /// callback started another transition.
    pub fn resolve_state(&self, key: K) -> Option<Rc<StateRecord<K, T>>> {
        let current = self.current();
        if *current.key() == key {
            trace!(machine = self.label(), state = ?key, "already in requested state");
            return None;
        }

        let next = if key.is_none() {
            Rc::clone(&self.inner.none)
        } else {
            let found = self.inner.registry.borrow().get(&key).cloned();
            match found {
                Some(record) => record,
                None => {
                    self.report(&StateError::UndefinedState { key });
                    return None;
                }
            }
        };

        self.transition(&current, Rc::clone(&next));
        Some(next)
    }

    /// Transition to an already resolved record, skipping the registry
    /// lookup.
    ///
    /// The no-op check compares records by identity, not by key.
    pub fn set_state_record(&self, record: &Rc<StateRecord<K, T>>) -> bool {
        let current = self.current();
        if Rc::ptr_eq(&current, record) {
            trace!(machine = self.label(), state = ?record.key(), "already in requested state");
            return false;
        }

        self.transition(&current, Rc::clone(record));
        true
    }

    /// Leave the current state without entering another one.
    ///
    /// Equivalent to `set_state(K::default())`.
    pub fn clear_state(&self) -> bool {
        self.set_state(K::none())
    }

    /// Run the current state's tick callback, if any.
    pub fn update(&self, delta_time: f32) {
        let current = self.current();
        trace!(machine = self.label(), state = ?current.key(), delta_time, "tick");
        current.tick(&self.inner.target, delta_time);
    }

    fn transition(&self, current: &Rc<StateRecord<K, T>>, next: Rc<StateRecord<K, T>>) {
        let target = &self.inner.target;

        current.exit(target, next.key());

        // A transition requested from the exit callback has already been
        // committed; the record actually replaced here is the previous state.
        let prev = self.inner.current.replace(Rc::clone(&next));
        let prev_key = prev.key().clone();

        self.inner
            .history
            .borrow_mut()
            .record(StateTransition::now(prev_key.clone(), next.key().clone()));
        debug!(machine = self.label(), from = ?prev_key, to = ?next.key(), "state changed");

        let listeners = self.inner.listeners.borrow().snapshot();
        for listener in listeners {
            listener(target, &prev_key, next.key());
        }

        next.enter(target, &prev_key);
    }

    /// Subscribe to committed transitions with `(previous, next)` keys.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&K, &K) + 'static,
    {
        self.subscribe_with_target(move |_: &T, prev: &K, next: &K| listener(prev, next))
    }

    /// Subscribe to committed transitions with `(target, previous, next)`.
    pub fn subscribe_with_target<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&T, &K, &K) + 'static,
    {
        self.inner.listeners.borrow_mut().add(Rc::new(listener))
    }

    /// Remove a listener. Returns `false` if it was already removed.
    ///
    /// A listener removed during a notification still receives that
    /// notification.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.listeners.borrow_mut().remove(id)
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Look up a registered state.
    pub fn try_get_state(&self, key: &K) -> Option<Rc<StateRecord<K, T>>> {
        self.inner.registry.borrow().get(key).cloned()
    }

    /// Look up a registered state that must exist.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not registered.
    pub fn get_state(&self, key: &K) -> Rc<StateRecord<K, T>> {
        match self.try_get_state(key) {
            Some(record) => record,
            None => panic!("{}", StateError::UndefinedState { key: key.clone() }),
        }
    }

    /// Check if `key` is registered. Always `false` for the sentinel.
    pub fn contains_state(&self, key: &K) -> bool {
        self.inner.registry.borrow().contains_key(key)
    }

    /// Number of registered states. The sentinel is never counted.
    pub fn state_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Registered keys, in no particular order.
    pub fn state_keys(&self) -> Vec<K> {
        self.inner.registry.borrow().keys().cloned().collect()
    }

    /// The active record; the sentinel record when no state is active.
    pub fn current(&self) -> Rc<StateRecord<K, T>> {
        Rc::clone(&self.inner.current.borrow())
    }

    /// Key of the active state; `K::default()` when none is active.
    pub fn current_key(&self) -> K {
        self.inner.current.borrow().key().clone()
    }

    /// Check if any registered state is active.
    pub fn is_active(&self) -> bool {
        !self.inner.current.borrow().is_none()
    }

    /// The target forwarded to callbacks.
    pub fn target(&self) -> &T {
        &self.inner.target
    }

    /// Configuration this machine was built with.
    pub fn config(&self) -> &MachineConfig {
        &self.inner.config
    }

    /// Snapshot of recent committed transitions.
    pub fn history(&self) -> StateHistory<K> {
        self.inner.history.borrow().clone()
    }

    /// Create a non-owning handle, for capture inside callbacks.
    pub fn downgrade(&self) -> WeakStateMachine<K, T> {
        WeakStateMachine {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn report(&self, err: &StateError<K>) {
        debug!(machine = self.label(), error = %err, "reporting state machine error");
        (self.inner.error_sink)(&err.to_string());
    }

    fn label(&self) -> &str {
        self.inner.config.label().unwrap_or_default()
    }
}

impl<K: StateKey, T> WeakStateMachine<K, T> {
    /// Recover the machine, if it is still alive.
    pub fn upgrade(&self) -> Option<StateMachine<K, T>> {
        self.inner.upgrade().map(|inner| StateMachine { inner })
    }
}

impl<K: StateKey, T> Clone for StateMachine<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: StateKey, T> Clone for WeakStateMachine<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<K: StateKey, T> fmt::Debug for StateMachine<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("label", &self.inner.config.label())
            .field("current", self.inner.current.borrow().key())
            .field("states", &self.inner.registry.borrow().len())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl<K: StateKey, T> fmt::Debug for WeakStateMachine<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStateMachine")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
