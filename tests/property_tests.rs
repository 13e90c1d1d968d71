//! Property-based tests for the transition protocol.
//!
//! These tests use proptest to drive machines through random sequences of
//! requests and check that the observable bookkeeping always agrees with a
//! simple model of the protocol.

use proptest::prelude::*;
use statecraft::core::StateKey;
use statecraft::{state_key, MachineConfig, StateBuilder, StateMachine};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

state_key! {
    enum TestState {
        Idle,
        Walking,
        Running,
        Falling,
    }
}

/// Falling is never registered, so requests for it exercise the error path.
const REGISTERED: [TestState; 3] = [TestState::Idle, TestState::Walking, TestState::Running];

prop_compose! {
    fn arbitrary_request()(variant in 0..5u8) -> TestState {
        match variant {
            0 => TestState::None,
            1 => TestState::Idle,
            2 => TestState::Walking,
            3 => TestState::Running,
            _ => TestState::Falling,
        }
    }
}

struct Harness {
    machine: StateMachine<TestState>,
    errors: Rc<Cell<usize>>,
    notifications: Rc<RefCell<Vec<(TestState, TestState)>>>,
    enters: Rc<RefCell<Vec<(TestState, TestState)>>>,
    exits: Rc<RefCell<Vec<(TestState, TestState)>>>,
}

fn harness() -> Harness {
    let errors = Rc::new(Cell::new(0));
    let counter = errors.clone();
    let config = MachineConfig::builder().history_limit(usize::MAX).build();
    let machine = StateMachine::with_config(config, move |_: &str| counter.set(counter.get() + 1));

    let enters = Rc::new(RefCell::new(Vec::new()));
    let exits = Rc::new(RefCell::new(Vec::new()));
    for state in REGISTERED {
        let (enter_log, exit_log) = (enters.clone(), exits.clone());
        machine.add_state(
            state,
            StateBuilder::<TestState>::new()
                .with_on_enter(move |prev| enter_log.borrow_mut().push((*prev, state)))
                .with_on_exit(move |next| exit_log.borrow_mut().push((state, *next))),
        );
    }

    let notifications = Rc::new(RefCell::new(Vec::new()));
    let log = notifications.clone();
    machine.subscribe(move |prev, next| log.borrow_mut().push((*prev, *next)));

    Harness {
        machine,
        errors,
        notifications,
        enters,
        exits,
    }
}

proptest! {
    #[test]
    fn machine_matches_reference_model(
        requests in prop::collection::vec(arbitrary_request(), 0..40)
    ) {
        let harness = harness();
        let mut model = TestState::None;
        let mut expected_errors = 0;
        let mut committed = Vec::new();

        for request in requests {
            let changed = harness.machine.set_state(request);

            if request == model {
                prop_assert!(!changed);
            } else if request == TestState::Falling {
                prop_assert!(!changed);
                expected_errors += 1;
            } else {
                prop_assert!(changed);
                committed.push((model, request));
                model = request;
            }

            prop_assert_eq!(harness.machine.current_key(), model);
        }

        prop_assert_eq!(harness.errors.get(), expected_errors);
        prop_assert_eq!(&*harness.notifications.borrow(), &committed);

        let expected_enters: Vec<_> = committed.iter().copied().filter(|(_, to)| !to.is_none()).collect();
        let expected_exits: Vec<_> = committed.iter().copied().filter(|(from, _)| !from.is_none()).collect();
        prop_assert_eq!(&*harness.enters.borrow(), &expected_enters);
        prop_assert_eq!(&*harness.exits.borrow(), &expected_exits);

        let history: Vec<_> = harness.machine.history().transitions().map(|t| (t.from, t.to)).collect();
        prop_assert_eq!(history, committed);
    }

    #[test]
    fn sentinel_is_never_registered(requests in prop::collection::vec(arbitrary_request(), 0..10)) {
        let harness = harness();

        for request in requests {
            harness.machine.set_state(request);
            prop_assert!(harness.machine.add_state(TestState::None, StateBuilder::new()).is_none());
        }

        prop_assert_eq!(harness.machine.state_count(), REGISTERED.len());
        prop_assert!(!harness.machine.contains_state(&TestState::None));
    }

    #[test]
    fn lookups_agree_with_registration(request in arbitrary_request()) {
        let harness = harness();
        let registered = REGISTERED.contains(&request);

        prop_assert_eq!(harness.machine.contains_state(&request), registered);
        match harness.machine.try_get_state(&request) {
            Some(record) => {
                prop_assert_eq!(record.key(), &request);
            }
            None => {
                prop_assert!(!registered);
            }
        }
    }

    #[test]
    fn update_ticks_only_the_active_state(
        requests in prop::collection::vec(arbitrary_request(), 1..20),
        delta_time in 0.0f32..1.0,
    ) {
        let machine = StateMachine::new(|_: &str| {});
        let ticks = Rc::new(RefCell::new(Vec::new()));
        for state in REGISTERED {
            let log = ticks.clone();
            machine.add_state(
                state,
                StateBuilder::<TestState>::new().with_on_tick(move |dt| log.borrow_mut().push((state, dt))),
            );
        }

        let mut expected = Vec::new();
        for request in requests {
            machine.set_state(request);
            machine.update(delta_time);
            let current = machine.current_key();
            if !current.is_none() {
                expected.push((current, delta_time));
            }
        }

        prop_assert_eq!(&*ticks.borrow(), &expected);
    }
}
