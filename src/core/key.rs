//! Key trait identifying registered states.
//!
//! Every state in a machine is identified by a value of a caller-chosen key
//! type. The key type's `Default` value is reserved as the sentinel meaning
//! "no active state".

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine keys.
///
/// Blanket-implemented for every type with the required bounds, so any
/// `enum` deriving `Clone, PartialEq, Eq, Hash, Debug, Default` works out of
/// the box.
///
/// # Required Traits
///
/// - `Clone`: keys are handed to callbacks and recorded in history
/// - `Eq` + `Hash`: keys index the registry
/// - `Debug`: keys appear in error messages and log fields
/// - `Default`: the default value is the reserved "none" sentinel
///
/// # Example
///
/// ```rust
/// use statecraft::core::StateKey;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
/// enum Door {
///     #[default]
///     None,
///     Open,
///     Closed,
/// }
///
/// assert!(Door::None.is_none());
/// assert!(!Door::Open.is_none());
/// assert_eq!(Door::none(), Door::None);
/// ```
pub trait StateKey: Clone + Eq + Hash + Debug + Default + 'static {
    /// The reserved sentinel value.
    fn none() -> Self {
        Self::default()
    }

    /// Check if this key is the reserved sentinel.
    fn is_none(&self) -> bool {
        *self == Self::default()
    }
}

impl<K> StateKey for K where K: Clone + Eq + Hash + Debug + Default + 'static {}
