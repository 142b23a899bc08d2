//! Netfsm: a replicated finite state machine.
//!
//! One machine runs on the authority and one on each peer. The authority
//! evaluates transition predicates every tick and mirrors state changes to
//! peers through reliable, ordered messages; peers apply them immediately or
//! queue them while their transitions are suspended.
//!
//! # Core Concepts
//!
//! - **States**: owner objects implementing `StateBehavior` (begin/end/tick),
//!   registered under a typed `StateId`
//! - **Transitions**: predicates evaluated in registration order, at most
//!   one transition per tick
//! - **Net modes**: `MachineNetMode` decides whether peers follow the
//!   authority, `StateNetMode` decides which peers hear about a state
//! - **Suspension**: peers can defer replicated changes and replay them in
//!   order later
//!
//! # Example
//!
//! ```rust
//! use netfsm::binding::{BoundState, BoundTransition};
//! use netfsm::builder::FsmBuilder;
//! use netfsm::net::{NetworkContext, StateNetMode};
//! use netfsm::state_ids;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! state_ids! {
//!     enum Guard {
//!         Patrol = 0,
//!         Chase = 1,
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Brain {
//!     sees_player: bool,
//!     chasing: bool,
//! }
//!
//! impl Brain {
//!     fn begin_chase(&mut self) {
//!         self.chasing = true;
//!     }
//!
//!     fn spotted(&self) -> bool {
//!         self.sees_player
//!     }
//! }
//!
//! let brain = Rc::new(RefCell::new(Brain::default()));
//! let mut fsm = FsmBuilder::new()
//!     .state(
//!         Guard::Patrol,
//!         BoundState::init(Rc::clone(&brain), None, None, None, StateNetMode::None),
//!     )
//!     .state(
//!         Guard::Chase,
//!         BoundState::init(
//!             Rc::clone(&brain),
//!             Some(Brain::begin_chase),
//!             None,
//!             None,
//!             StateNetMode::None,
//!         ),
//!     )
//!     .transition(
//!         Guard::Patrol,
//!         Guard::Chase,
//!         BoundTransition::init(Rc::clone(&brain), Brain::spotted),
//!     )
//!     .starting_state(Guard::Patrol)
//!     .build()
//!     .unwrap();
//!
//! let ctx = NetworkContext::authority();
//! fsm.activate(ctx).unwrap();
//! brain.borrow_mut().sees_player = true;
//! fsm.on_tick(ctx, 0.016).unwrap();
//!
//! assert_eq!(fsm.current_state(), Some(Guard::Chase));
//! assert!(brain.borrow().chasing);
//! ```

pub mod binding;
pub mod builder;
pub mod config;
pub mod core;
pub mod machine;
pub mod net;
pub mod snapshot;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, FsmBuilder};
pub use config::{FsmConfig, TickMode};
pub use core::{StateBehavior, StateId, TransitionPredicate};
pub use machine::{Fsm, FsmError};
pub use net::{MachineNetMode, NetworkContext, ReplicationMessage, StateCommand, StateNetMode};
