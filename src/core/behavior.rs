//! Capability traits implemented by state and transition objects.
//!
//! A machine only knows states and transitions through these traits. Owners
//! implement them directly, or use the adapters in [`crate::binding`] to
//! forward the calls to their own methods.

use crate::net::StateNetMode;

/// Lifecycle callbacks of a single state.
///
/// `begin` receives `was_replicated = true` only when a peer enters the
/// starting state on activation from replicated data. Every other entry,
/// including entries driven by replication messages, passes `false`.
pub trait StateBehavior {
    /// Which peers are told about this state. Read once, at registration.
    fn net_mode(&self) -> StateNetMode {
        StateNetMode::None
    }

    fn begin(&mut self, was_replicated: bool);

    fn end(&mut self);

    fn tick(&mut self, delta_time: f32);
}

/// Predicate guarding one outgoing transition.
///
/// Evaluated once per tick while its source state is current, in the order
/// the transitions were registered.
///
/// # Example
///
/// ```rust
/// use netfsm::core::TransitionPredicate;
/// use std::cell::Cell;
///
/// let ticks = Cell::new(3);
/// let ready = || ticks.get() >= 2;
///
/// assert!(ready.check());
/// ```
pub trait TransitionPredicate {
    fn check(&self) -> bool;
}

impl<F> TransitionPredicate for F
where
    F: Fn() -> bool,
{
    fn check(&self) -> bool {
        self()
    }
}
