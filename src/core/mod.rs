//! Core machine vocabulary.
//!
//! This module contains the types every other module is written against:
//! - State ids via the `StateId` trait
//! - The `StateBehavior` / `TransitionPredicate` capabilities
//! - The bounded lifecycle history

mod behavior;
mod history;
mod state;

pub use behavior::{StateBehavior, TransitionPredicate};
pub use history::{LifecycleEvent, LifecycleRecord, StateHistory, DEFAULT_HISTORY_CAPACITY};
pub use state::{StateId, INVALID_STATE_ID};
