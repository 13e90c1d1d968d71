//! Ready-made error sinks.
//!
//! A machine reports invalid registrations and transitions by calling its
//! error sink with a human-readable message. Any `Fn(&str)` works; these are
//! the common choices.

use tracing::error;

/// Sink that emits each message as a `tracing` error event.
pub fn tracing_sink() -> impl Fn(&str) + 'static {
    |message: &str| error!(target: "statecraft", "{message}")
}

/// Sink that discards every message.
pub fn silent() -> impl Fn(&str) + 'static {
    |_: &str| {}
}
