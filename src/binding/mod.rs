//! Adapters binding an owner's methods to the state and transition traits.
//!
//! An owner keeps its data in an `Rc<RefCell<_>>` and hands the machine a
//! [`BoundState`] or [`BoundTransition`] per registration. The owner does not
//! implement any trait itself: each adapter forwards to plain method pointers.
//!
//! # Example
//!
//! ```rust
//! use netfsm::binding::{BoundState, BoundTransition};
//! use netfsm::core::{StateBehavior, TransitionPredicate};
//! use netfsm::net::StateNetMode;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! #[derive(Default)]
//! struct Door {
//!     open: bool,
//!     timer: f32,
//! }
//!
//! impl Door {
//!     fn begin_open(&mut self) {
//!         self.open = true;
//!     }
//!
//!     fn tick_open(&mut self, dt: f32) {
//!         self.timer += dt;
//!     }
//!
//!     fn should_close(&self) -> bool {
//!         self.timer > 1.0
//!     }
//! }
//!
//! let door = Rc::new(RefCell::new(Door::default()));
//! let mut open = BoundState::init(
//!     Rc::clone(&door),
//!     Some(Door::begin_open),
//!     None,
//!     Some(Door::tick_open),
//!     StateNetMode::None,
//! );
//! let close = BoundTransition::init(Rc::clone(&door), Door::should_close);
//!
//! open.begin(false);
//! open.tick(1.5);
//! assert!(door.borrow().open);
//! assert!(close.check());
//! ```

use crate::core::{StateBehavior, TransitionPredicate};
use crate::net::StateNetMode;
use std::cell::RefCell;
use std::rc::Rc;

pub type BeginMethod<O> = fn(&mut O);
pub type ReplicatedBeginMethod<O> = fn(&mut O, bool);
pub type EndMethod<O> = fn(&mut O);
pub type TickMethod<O> = fn(&mut O, f32);
pub type PredicateMethod<O> = fn(&O) -> bool;

/// Exactly one begin form is active per binding.
enum Begin<O> {
    Plain(Option<BeginMethod<O>>),
    Replicated(ReplicatedBeginMethod<O>),
}

/// State whose callbacks are methods of a shared owner.
pub struct BoundState<O> {
    owner: Rc<RefCell<O>>,
    begin: Begin<O>,
    end: Option<EndMethod<O>>,
    tick: Option<TickMethod<O>>,
    net_mode: StateNetMode,
}

impl<O> BoundState<O> {
    /// Bind a state whose begin ignores the `was_replicated` flag.
    pub fn init(
        owner: Rc<RefCell<O>>,
        begin: Option<BeginMethod<O>>,
        end: Option<EndMethod<O>>,
        tick: Option<TickMethod<O>>,
        net_mode: StateNetMode,
    ) -> Self {
        Self {
            owner,
            begin: Begin::Plain(begin),
            end,
            tick,
            net_mode,
        }
    }

    /// Bind a state whose begin receives the `was_replicated` flag.
    pub fn init_net(
        owner: Rc<RefCell<O>>,
        begin: ReplicatedBeginMethod<O>,
        end: Option<EndMethod<O>>,
        tick: Option<TickMethod<O>>,
        net_mode: StateNetMode,
    ) -> Self {
        Self {
            owner,
            begin: Begin::Replicated(begin),
            end,
            tick,
            net_mode,
        }
    }
}

impl<O> StateBehavior for BoundState<O> {
    fn net_mode(&self) -> StateNetMode {
        self.net_mode
    }

    fn begin(&mut self, was_replicated: bool) {
        match self.begin {
            Begin::Replicated(method) => method(&mut self.owner.borrow_mut(), was_replicated),
            Begin::Plain(Some(method)) => method(&mut self.owner.borrow_mut()),
            Begin::Plain(None) => {}
        }
    }

    fn end(&mut self) {
        if let Some(method) = self.end {
            method(&mut self.owner.borrow_mut());
        }
    }

    fn tick(&mut self, delta_time: f32) {
        if let Some(method) = self.tick {
            method(&mut self.owner.borrow_mut(), delta_time);
        }
    }
}

/// Transition whose predicate is a method of a shared owner.
pub struct BoundTransition<O> {
    owner: Rc<RefCell<O>>,
    predicate: PredicateMethod<O>,
}

impl<O> BoundTransition<O> {
    /// Bind `predicate`, evaluated against the owner on every check.
    pub fn init(owner: Rc<RefCell<O>>, predicate: PredicateMethod<O>) -> Self {
        Self { owner, predicate }
    }
}

impl<O> TransitionPredicate for BoundTransition<O> {
    fn check(&self) -> bool {
        (self.predicate)(&self.owner.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Owner {
        plain_begins: usize,
        replicated_begins: Vec<bool>,
        ends: usize,
        elapsed: f32,
        ready: bool,
    }

    impl Owner {
        fn begin(&mut self) {
            self.plain_begins += 1;
        }

        fn begin_net(&mut self, replicated: bool) {
            self.replicated_begins.push(replicated);
        }

        fn end(&mut self) {
            self.ends += 1;
        }

        fn tick(&mut self, dt: f32) {
            self.elapsed += dt;
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }

    fn shared() -> Rc<RefCell<Owner>> {
        Rc::new(RefCell::new(Owner::default()))
    }

    #[test]
    fn init_forwards_plain_begin() {
        let owner = shared();
        let mut state = BoundState::init(
            Rc::clone(&owner),
            Some(Owner::begin),
            Some(Owner::end),
            Some(Owner::tick),
            StateNetMode::AllPeers,
        );

        state.begin(true);
        state.tick(0.25);
        state.tick(0.25);
        state.end();

        let owner = owner.borrow();
        assert_eq!(owner.plain_begins, 1);
        assert!(owner.replicated_begins.is_empty());
        assert_eq!(owner.ends, 1);
        assert_eq!(owner.elapsed, 0.5);
        assert_eq!(state.net_mode(), StateNetMode::AllPeers);
    }

    #[test]
    fn init_net_forwards_replicated_flag() {
        let owner = shared();
        let mut state = BoundState::init_net(
            Rc::clone(&owner),
            Owner::begin_net,
            None,
            None,
            StateNetMode::OwnerOnly,
        );

        state.begin(true);
        state.begin(false);
        state.end();
        state.tick(1.0);

        let owner = owner.borrow();
        assert_eq!(owner.replicated_begins, vec![true, false]);
        assert_eq!(owner.plain_begins, 0);
        assert_eq!(owner.ends, 0);
        assert_eq!(owner.elapsed, 0.0);
    }

    #[test]
    fn missing_methods_are_skipped() {
        let owner = shared();
        let mut state = BoundState::init(Rc::clone(&owner), None, None, None, StateNetMode::None);

        state.begin(false);
        state.end();
        state.tick(1.0);

        assert_eq!(owner.borrow().plain_begins, 0);
    }

    #[test]
    fn transition_reads_owner() {
        let owner = shared();
        let transition = BoundTransition::init(Rc::clone(&owner), Owner::is_ready);

        assert!(!transition.check());
        owner.borrow_mut().ready = true;
        assert!(transition.check());
    }
}
