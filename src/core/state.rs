//! State identifiers.
//!
//! Every state registered in a machine is addressed by a small typed id.
//! Ids are plain values: the machine never stores state behavior inside them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Raw id reserved for "no state". It can never be registered.
pub const INVALID_STATE_ID: i8 = -42;

/// Trait for state identifiers.
///
/// Ids are compact (`i8` on the wire), cheap to copy and serializable so that
/// they can travel inside replication messages and snapshots.
///
/// # Required Traits
///
/// - `Copy` + `Eq` + `Hash`: ids index the machine's state table
/// - `Debug`: ids show up in diagnostics
/// - `Serialize` + `Deserialize`: ids are replicated to peers
///
/// # Example
///
/// ```rust
/// use netfsm::core::StateId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// #[repr(i8)]
/// enum DoorState {
///     Closed = 0,
///     Open = 1,
/// }
///
/// impl StateId for DoorState {
///     fn raw(self) -> i8 {
///         self as i8
///     }
///
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Open => "Open",
///         }
///     }
/// }
///
/// assert_eq!(DoorState::Open.raw(), 1);
/// assert!(!DoorState::Open.is_sentinel());
/// ```
pub trait StateId:
    Copy + Eq + Hash + Debug + Serialize + DeserializeOwned + 'static
{
    /// Raw `i8` representation of the id.
    fn raw(self) -> i8;

    /// Human readable name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this id collides with [`INVALID_STATE_ID`].
    fn is_sentinel(self) -> bool {
        self.raw() == INVALID_STATE_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    #[repr(i8)]
    enum TestState {
        Idle = 0,
        Running = 1,
        Broken = -42,
    }

    impl StateId for TestState {
        fn raw(self) -> i8 {
            self as i8
        }

        fn name(&self) -> &'static str {
            match self {
                Self::Idle => "Idle",
                Self::Running => "Running",
                Self::Broken => "Broken",
            }
        }
    }

    #[test]
    fn raw_uses_discriminant() {
        assert_eq!(TestState::Idle.raw(), 0);
        assert_eq!(TestState::Running.raw(), 1);
    }

    #[test]
    fn sentinel_is_detected() {
        assert!(TestState::Broken.is_sentinel());
        assert!(!TestState::Idle.is_sentinel());
    }

    #[test]
    fn id_serializes_correctly() {
        let json = serde_json::to_string(&TestState::Running).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, TestState::Running);
    }
}
