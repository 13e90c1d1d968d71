//! State transition history tracking.
//!
//! Every committed transition is appended to a bounded ring so hosts can
//! inspect recent machine behavior for diagnostics.

use super::key::StateKey;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use statecraft::core::StateTransition;
///
/// let transition = StateTransition::now("idle", "run");
/// assert_eq!(transition.from, "idle");
/// assert_eq!(transition.to, "run");
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StateTransition<K> {
    /// The state being transitioned from
    pub from: K,
    /// The state being transitioned to
    pub to: K,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

impl<K> StateTransition<K> {
    /// Create a transition stamped with the current time.
    pub fn now(from: K, to: K) -> Self {
        Self {
            from,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// Bounded, ordered history of committed transitions.
///
/// Holds at most `limit` entries; the oldest entry is dropped when a new one
/// would exceed the limit. A limit of `0` disables recording.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{StateHistory, StateTransition};
///
/// let mut history = StateHistory::with_limit(2);
/// history.record(StateTransition::now("", "idle"));
/// history.record(StateTransition::now("idle", "run"));
/// history.record(StateTransition::now("run", "jump"));
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.get_path(), vec![&"idle", &"run", &"jump"]);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StateHistory<K> {
    transitions: VecDeque<StateTransition<K>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    limit: usize,
}

impl<K: StateKey> StateHistory<K> {
    /// Create an empty history holding at most `limit` transitions.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(64)),
            limit,
        }
    }

    /// Append a transition, evicting the oldest entry if full.
    pub fn record(&mut self, transition: StateTransition<K>) {
        if self.limit == 0 {
            return;
        }
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained transition followed by
    /// the `to` state of each transition, in order.
    pub fn get_path(&self) -> Vec<&K> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|transition| &transition.to));
        path
    }

    /// Time elapsed between the oldest and newest retained transitions.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.transitions.front()?;
        let last = self.transitions.back()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Iterate over retained transitions, oldest first.
    pub fn transitions(&self) -> impl DoubleEndedIterator<Item = &StateTransition<K>> + '_ {
        self.transitions.iter()
    }

    /// The most recent transition.
    pub fn last(&self) -> Option<&StateTransition<K>> {
        self.transitions.back()
    }

    /// Number of transitions currently kept.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Check if no transition is kept.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Maximum number of transitions kept; older ones are dropped first.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drop every kept transition. The limit is unchanged.
    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize))]
    enum TestState {
        #[default]
        None,
        Idle,
        Running,
        Jumping,
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState> = StateHistory::with_limit(8);
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let mut history = StateHistory::with_limit(8);
        history.record(StateTransition::now(TestState::None, TestState::Idle));
        history.record(StateTransition::now(TestState::Idle, TestState::Running));

        assert_eq!(
            history.get_path(),
            vec![&TestState::None, &TestState::Idle, &TestState::Running]
        );
        assert_eq!(history.last().map(|t| &t.to), Some(&TestState::Running));
    }

    #[test]
    fn oldest_entries_are_evicted_at_limit() {
        let mut history = StateHistory::with_limit(2);
        history.record(StateTransition::now(TestState::None, TestState::Idle));
        history.record(StateTransition::now(TestState::Idle, TestState::Running));
        history.record(StateTransition::now(TestState::Running, TestState::Jumping));

        assert_eq!(history.len(), 2);
        let froms: Vec<_> = history.transitions().map(|t| t.from.clone()).collect();
        assert_eq!(froms, vec![TestState::Idle, TestState::Running]);
    }

    #[test]
    fn zero_limit_disables_recording() {
        let mut history = StateHistory::with_limit(0);
        history.record(StateTransition::now(TestState::None, TestState::Idle));

        assert!(history.is_empty());
        assert_eq!(history.limit(), 0);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = StateHistory::with_limit(4);
        history.record(StateTransition::now(TestState::None, TestState::Idle));

        std::thread::sleep(Duration::from_millis(10));

        history.record(StateTransition::now(TestState::Idle, TestState::Running));

        let duration = history.duration().unwrap();
        assert!(duration >= Duration::from_millis(10));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let mut history = StateHistory::with_limit(4);
        history.record(StateTransition::now(TestState::None, TestState::Idle));

        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn clear_drops_all_entries() {
        let mut history = StateHistory::with_limit(4);
        history.record(StateTransition::now(TestState::None, TestState::Idle));
        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.limit(), 4);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn history_serializes_transitions() {
        let mut history = StateHistory::with_limit(4);
        history.record(StateTransition::now(TestState::Idle, TestState::Running));

        let json = serde_json::to_value(&history).unwrap();
        let transitions = json["transitions"].as_array().unwrap();

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0]["from"], "Idle");
        assert_eq!(transitions[0]["to"], "Running");
        assert!(json.get("limit").is_none());
    }
}
