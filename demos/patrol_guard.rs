//! A guard whose behavior is driven by a targeted state machine.
//!
//! The machine owns a shared handle to the guard and passes it to every
//! callback, so state logic never has to capture the guard itself.

use statecraft::{sink, state_key, MachineConfig, StateBuilder, StateMachine};
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

state_key! {
    enum Mode {
        Patrol,
        Chase,
        Rest,
    }
}

#[derive(Debug, Default)]
struct Guard {
    position: f32,
    stamina: f32,
    alerts: Vec<String>,
}

type Shared = Rc<RefCell<Guard>>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let guard: Shared = Rc::new(RefCell::new(Guard {
        stamina: 3.0,
        ..Guard::default()
    }));
    let config = MachineConfig::builder().label("guard").history_limit(16).build();
    let machine = StateMachine::with_target_and_config(guard.clone(), config, sink::tracing_sink());

    machine.add_state(
        Mode::Patrol,
        StateBuilder::new()
            .with_target_on_tick(|guard: &Shared, dt: f32| guard.borrow_mut().position += dt),
    );

    let handle = machine.downgrade();
    machine.add_state(
        Mode::Chase,
        StateBuilder::new()
            .with_target_on_enter(|guard: &Shared, prev: &Mode| {
                guard
                    .borrow_mut()
                    .alerts
                    .push(format!("intruder spotted while in {}", prev.name()))
            })
            .with_target_on_tick(move |guard: &Shared, dt: f32| {
                let exhausted = {
                    let mut guard = guard.borrow_mut();
                    guard.position += 3.0 * dt;
                    guard.stamina -= dt;
                    guard.stamina <= 0.0
                };
                if exhausted {
                    if let Some(machine) = handle.upgrade() {
                        machine.set_state(Mode::Rest);
                    }
                }
            }),
    );

    machine.add_state(
        Mode::Rest,
        StateBuilder::new()
            .with_target_on_tick(|guard: &Shared, dt: f32| guard.borrow_mut().stamina += dt)
            .with_target_on_exit(|guard: &Shared, next: &Mode| {
                guard
                    .borrow_mut()
                    .alerts
                    .push(format!("rested, heading to {}", next.name()))
            }),
    );

    machine.subscribe_with_target(|guard: &Shared, prev: &Mode, next: &Mode| {
        println!(
            "{} -> {} at position {:.1}",
            prev.name(),
            next.name(),
            guard.borrow().position
        )
    });

    machine.set_state(Mode::Patrol);
    for frame in 0..12 {
        if frame == 4 {
            machine.set_state(Mode::Chase);
        }
        machine.update(0.5);
    }
    machine.set_state(Mode::Patrol);
    machine.set_state(Mode::Patrol);
    machine.set_state(Mode::None);

    println!("{:#?}", guard.borrow());
    println!("{machine:?}");
}
