//! State change subscriptions.

use std::rc::Rc;

/// Shared state change callback: `(target, previous, next)`.
pub(crate) type Listener<K, T> = Rc<dyn Fn(&T, &K, &K)>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Ordered list of state change listeners.
pub(crate) struct Listeners<K, T> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener<K, T>)>,
}

impl<K, T> Listeners<K, T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, listener: Listener<K, T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Clone out the current listeners so they can run without a borrow held.
    ///
    /// Subscriptions added or removed while the snapshot runs take effect
    /// from the next transition.
    pub(crate) fn snapshot(&self) -> Vec<Listener<K, T>> {
        self.entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
