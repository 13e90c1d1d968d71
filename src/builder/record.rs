//! Builder for per-state callback bundles.

use crate::core::{EnterFn, ExitFn, StateKey, StateRecord, TickFn};
use std::any::Any;
use std::fmt;

/// Fluent builder for a [`StateRecord`].
///
/// The builder carries no key: the key is assigned when the builder is
/// registered with [`StateMachine::add_state`](crate::StateMachine::add_state),
/// which consumes it and returns the finished, immutable record.
///
/// Every callback slot has two setters. The plain form (`with_on_enter`)
/// takes a closure over the key or delta time only. The `with_target_*` form
/// also receives the machine's target, for machines built with
/// [`StateMachine::with_target`](crate::StateMachine::with_target).
/// Setting a slot twice keeps the last closure.
///
/// # Example
///
/// ```rust
/// use statecraft::{StateBuilder, StateMachine};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
/// enum Light {
///     #[default]
///     None,
///     Green,
///     Red,
/// }
///
/// let machine = StateMachine::new(|message: &str| eprintln!("{message}"));
/// let green = machine
///     .add_state(
///         Light::Green,
///         StateBuilder::new()
///             .with_on_enter(|prev: &Light| println!("green after {prev:?}"))
///             .with_on_tick(|dt| println!("green for another {dt}s"))
///             .with_user_data("go"),
///     )
///     .unwrap();
///
/// assert_eq!(green.key(), &Light::Green);
/// assert_eq!(green.user_data::<&str>(), Some(&"go"));
/// ```
pub struct StateBuilder<K: StateKey, T = ()> {
    on_enter: Option<EnterFn<K, T>>,
    on_tick: Option<TickFn<T>>,
    on_exit: Option<ExitFn<K, T>>,
    user_data: Option<Box<dyn Any>>,
}

impl<K: StateKey, T: 'static> StateBuilder<K, T> {
    /// Create a builder with no callbacks and no payload.
    pub fn new() -> Self {
        Self {
            on_enter: None,
            on_tick: None,
            on_exit: None,
            user_data: None,
        }
    }

    /// Run `f` with the previous key when the state becomes active.
    pub fn with_on_enter<F>(self, f: F) -> Self
    where
        F: Fn(&K) + 'static,
    {
        self.with_target_on_enter(move |_: &T, prev: &K| f(prev))
    }

    /// Run `f` with delta time on every tick while the state is active.
    pub fn with_on_tick<F>(self, f: F) -> Self
    where
        F: Fn(f32) + 'static,
    {
        self.with_target_on_tick(move |_: &T, delta_time: f32| f(delta_time))
    }

    /// Run `f` with the next key when the state stops being active.
    pub fn with_on_exit<F>(self, f: F) -> Self
    where
        F: Fn(&K) + 'static,
    {
        self.with_target_on_exit(move |_: &T, next: &K| f(next))
    }

    /// Like [`with_on_enter`](Self::with_on_enter), also receiving the target.
    pub fn with_target_on_enter<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &K) + 'static,
    {
        self.on_enter = Some(Box::new(f));
        self
    }

    /// Like [`with_on_tick`](Self::with_on_tick), also receiving the target.
    pub fn with_target_on_tick<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, f32) + 'static,
    {
        self.on_tick = Some(Box::new(f));
        self
    }

    /// Like [`with_on_exit`](Self::with_on_exit), also receiving the target.
    pub fn with_target_on_exit<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &K) + 'static,
    {
        self.on_exit = Some(Box::new(f));
        self
    }

    /// Attach an opaque payload, readable later via
    /// [`StateRecord::user_data`].
    pub fn with_user_data<U: Any>(mut self, data: U) -> Self {
        self.user_data = Some(Box::new(data));
        self
    }

    /// Assemble a builder from already boxed callbacks.
    pub fn from_parts(
        on_enter: Option<EnterFn<K, T>>,
        on_tick: Option<TickFn<T>>,
        on_exit: Option<ExitFn<K, T>>,
    ) -> Self {
        Self {
            on_enter,
            on_tick,
            on_exit,
            user_data: None,
        }
    }

    pub(crate) fn build(self, key: K) -> StateRecord<K, T> {
        StateRecord::new(
            key,
            self.on_enter,
            self.on_tick,
            self.on_exit,
            self.user_data,
        )
    }
}

impl<K: StateKey, T: 'static> Default for StateBuilder<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateKey, T> fmt::Debug for StateBuilder<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateBuilder")
            .field("on_enter", &self.on_enter.is_some())
            .field("on_tick", &self.on_tick.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("user_data", &self.user_data.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
    enum TestState {
        #[default]
        None,
        Idle,
        Running,
    }

    #[test]
    fn empty_builder_produces_bare_record() {
        let record = StateBuilder::<TestState>::new().build(TestState::Idle);

        assert_eq!(record.key(), &TestState::Idle);
        assert!(!record.has_on_enter());
        assert!(!record.has_on_tick());
        assert!(!record.has_on_exit());
        assert!(!record.has_user_data());
    }

    #[test]
    fn fluent_api_sets_every_slot() {
        let record = StateBuilder::<TestState>::new()
            .with_on_enter(|_| {})
            .with_on_tick(|_| {})
            .with_on_exit(|_| {})
            .with_user_data(7_i32)
            .build(TestState::Running);

        assert!(record.has_on_enter());
        assert!(record.has_on_tick());
        assert!(record.has_on_exit());
        assert_eq!(record.user_data::<i32>(), Some(&7));
    }

    #[test]
    fn plain_callbacks_ignore_target() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let enter_seen = seen.clone();
        let exit_seen = seen.clone();

        let record = StateBuilder::<TestState, String>::new()
            .with_on_enter(move |prev| enter_seen.borrow_mut().push(prev.clone()))
            .with_on_exit(move |next| exit_seen.borrow_mut().push(next.clone()))
            .build(TestState::Idle);

        let target = "player".to_string();
        record.enter(&target, &TestState::None);
        record.exit(&target, &TestState::Running);

        assert_eq!(*seen.borrow(), vec![TestState::None, TestState::Running]);
    }

    #[test]
    fn target_callbacks_receive_target() {
        let total = Rc::new(RefCell::new(0.0_f32));
        let sink = total.clone();

        let record = StateBuilder::<TestState, f32>::new()
            .with_target_on_tick(move |scale, dt| *sink.borrow_mut() += scale * dt)
            .build(TestState::Running);

        record.tick(&2.0, 0.5);
        record.tick(&2.0, 0.25);

        assert_eq!(*total.borrow(), 1.5);
    }

    #[test]
    fn later_setter_replaces_earlier_one() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let first = calls.clone();
        let second = calls.clone();

        let record = StateBuilder::<TestState>::new()
            .with_on_enter(move |_| first.borrow_mut().push("first"))
            .with_on_enter(move |_| second.borrow_mut().push("second"))
            .build(TestState::Idle);

        record.enter(&(), &TestState::None);

        assert_eq!(*calls.borrow(), vec!["second"]);
    }

    #[test]
    fn from_parts_keeps_boxed_callbacks() {
        let builder: StateBuilder<TestState> =
            StateBuilder::from_parts(None, Some(Box::new(|_: &(), _: f32| {})), None);
        let record = builder.build(TestState::Running);

        assert!(!record.has_on_enter());
        assert!(record.has_on_tick());
        assert!(!record.has_on_exit());
    }
}
