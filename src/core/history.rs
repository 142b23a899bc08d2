//! Lifecycle history of a machine.
//!
//! Records every begin and end the machine invokes on its states, in the
//! order they happened. The log is bounded: once full, the oldest records
//! are dropped. A capacity of zero disables recording.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of records kept per machine.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// What happened to a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// `begin` was invoked with the given `was_replicated` flag.
    Began { replicated: bool },
    /// `end` was invoked.
    Ended,
}

/// Record of a single lifecycle callback.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct LifecycleRecord<S: StateId> {
    /// The state whose callback ran
    pub state: S,
    /// Which callback ran
    pub event: LifecycleEvent,
    /// When it ran
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded log of lifecycle callbacks.
///
/// # Example
///
/// ```rust
/// use netfsm::core::{LifecycleEvent, StateHistory};
/// use netfsm::state_ids;
///
/// state_ids! {
///     enum Phase {
///         One = 0,
///         Two = 1,
///     }
/// }
///
/// let mut history = StateHistory::with_capacity(8);
/// history.record(Phase::One, LifecycleEvent::Began { replicated: false });
/// history.record(Phase::One, LifecycleEvent::Ended);
/// history.record(Phase::Two, LifecycleEvent::Began { replicated: false });
///
/// assert_eq!(history.get_path(), vec![Phase::One, Phase::Two]);
/// assert_eq!(history.begin_count(), 2);
/// assert_eq!(history.end_count(), 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: StateId> {
    capacity: usize,
    records: VecDeque<LifecycleRecord<S>>,
}

impl<S: StateId> Default for StateHistory<S> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<S: StateId> StateHistory<S> {
    /// Create an empty history holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, state: S, event: LifecycleEvent) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(LifecycleRecord {
            state,
            event,
            timestamp: Utc::now(),
        });
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All retained records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &LifecycleRecord<S>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// States entered, in order.
    pub fn get_path(&self) -> Vec<S> {
        self.records
            .iter()
            .filter(|r| matches!(r.event, LifecycleEvent::Began { .. }))
            .map(|r| r.state)
            .collect()
    }

    pub fn begin_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.event, LifecycleEvent::Began { .. }))
            .count()
    }

    pub fn end_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.event == LifecycleEvent::Ended)
            .count()
    }

    /// Time between the oldest and the newest retained record.
    ///
    /// Returns `None` if nothing was recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::state_ids! {
        enum TestState {
            Initial = 0,
            Processing = 1,
            Complete = 2,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState> = StateHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
        assert!(history.duration().is_none());
    }

    #[test]
    fn records_keep_order() {
        let mut history = StateHistory::with_capacity(10);
        history.record(TestState::Initial, LifecycleEvent::Began { replicated: true });
        history.record(TestState::Initial, LifecycleEvent::Ended);
        history.record(TestState::Processing, LifecycleEvent::Began { replicated: false });

        let events: Vec<_> = history.records().map(|r| (r.state, r.event)).collect();
        assert_eq!(
            events,
            vec![
                (TestState::Initial, LifecycleEvent::Began { replicated: true }),
                (TestState::Initial, LifecycleEvent::Ended),
                (TestState::Processing, LifecycleEvent::Began { replicated: false }),
            ]
        );
        assert!(history.duration().is_some());
    }

    #[test]
    fn oldest_records_are_evicted() {
        let mut history = StateHistory::with_capacity(2);
        history.record(TestState::Initial, LifecycleEvent::Began { replicated: false });
        history.record(TestState::Initial, LifecycleEvent::Ended);
        history.record(TestState::Complete, LifecycleEvent::Began { replicated: false });

        assert_eq!(history.len(), 2);
        assert_eq!(history.get_path(), vec![TestState::Complete]);
        assert_eq!(history.end_count(), 1);
    }

    #[test]
    fn zero_capacity_disables_recording() {
        let mut history = StateHistory::with_capacity(0);
        history.record(TestState::Initial, LifecycleEvent::Began { replicated: false });
        assert!(history.is_empty());
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = StateHistory::with_capacity(4);
        history.record(TestState::Initial, LifecycleEvent::Began { replicated: false });

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState> = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.get_path(), vec![TestState::Initial]);
    }
}
