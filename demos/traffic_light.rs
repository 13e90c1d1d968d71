//! Traffic light driven entirely from tick callbacks.
//!
//! Each light keeps its own timer and requests the next light when it runs
//! out. Run with `RUST_LOG=statecraft=debug` to see transitions logged.

use statecraft::{sink, state_key, StateBuilder, StateMachine, WeakStateMachine};
use std::cell::Cell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

state_key! {
    enum Light {
        Green,
        Yellow,
        Red,
    }
}

fn timed_light(
    machine: &WeakStateMachine<Light>,
    duration: f32,
    next: Light,
) -> StateBuilder<Light> {
    let elapsed = Rc::new(Cell::new(0.0_f32));
    let reset = elapsed.clone();
    let handle = machine.clone();

    StateBuilder::new()
        .with_on_enter(move |_| reset.set(0.0))
        .with_on_tick(move |dt| {
            elapsed.set(elapsed.get() + dt);
            if elapsed.get() >= duration {
                if let Some(machine) = handle.upgrade() {
                    machine.set_state(next);
                }
            }
        })
        .with_user_data(duration)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let machine = StateMachine::new(sink::tracing_sink());
    let handle = machine.downgrade();

    machine.add_state(Light::Green, timed_light(&handle, 3.0, Light::Yellow));
    machine.add_state(Light::Yellow, timed_light(&handle, 1.0, Light::Red));
    machine.add_state(Light::Red, timed_light(&handle, 2.0, Light::Green));

    machine.subscribe(|prev, next| println!("{} -> {}", prev.name(), next.name()));

    machine.set_state(Light::Green);
    for _ in 0..14 {
        machine.update(0.5);
    }

    if let Some(duration) = machine.current().user_data::<f32>() {
        println!(
            "finished in {} (lasts {duration}s)",
            machine.current_key().name()
        );
    }

    let history = machine.history();
    let path: Vec<_> = history.get_path().into_iter().map(Light::name).collect();
    println!("path: {}", path.join(" -> "));
}
