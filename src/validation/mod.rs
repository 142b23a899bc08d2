//! Activation-time configuration checks.
//!
//! Uses Stillwater's `Validation` so that a misconfigured machine reports
//! every problem at once rather than the first one found.

use crate::core::StateId;
use crate::machine::Fsm;
use crate::net::{MachineNetMode, StateNetMode};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A configuration problem that prevents activation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("No states registered")]
    NoStates,

    #[error("Starting state not set")]
    MissingStartingState,

    #[error("Transition '{from}' -> '{to}' targets an unregistered state")]
    UnregisteredTarget { from: String, to: String },

    #[error("Synchronized machine has non-replicated state '{state}'")]
    LocalStateInSynchronizedMachine { state: String },

    #[error("{machine:?} machine has replicated state '{state}' ({mode:?})")]
    ReplicatedStateInLocalMachine {
        machine: MachineNetMode,
        state: String,
        mode: StateNetMode,
    },
}

pub type ConfigValidation = Validation<(), NonEmptyVec<ConfigViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> ConfigViolation) -> ConfigValidation {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Check that `fsm` may be activated, accumulating ALL violations.
pub fn validate_activation<S: StateId>(fsm: &Fsm<S>) -> ConfigValidation {
    let mut checks: Vec<ConfigValidation> = Vec::new();

    checks.push(check(fsm.state_count() > 0, || ConfigViolation::NoStates));
    checks.push(check(fsm.starting_state().is_some(), || {
        ConfigViolation::MissingStartingState
    }));

    for (from, to) in fsm.transition_edges() {
        checks.push(check(fsm.is_registered(to), || {
            ConfigViolation::UnregisteredTarget {
                from: from.name().to_string(),
                to: to.name().to_string(),
            }
        }));
    }

    let machine = fsm.net_mode();
    for (id, mode) in fsm.state_net_modes() {
        let consistent = match machine {
            MachineNetMode::Synchronized => mode != StateNetMode::None,
            MachineNetMode::None | MachineNetMode::Autonomous => mode == StateNetMode::None,
        };
        checks.push(check(consistent, || {
            if machine == MachineNetMode::Synchronized {
                ConfigViolation::LocalStateInSynchronizedMachine {
                    state: id.name().to_string(),
                }
            } else {
                ConfigViolation::ReplicatedStateInLocalMachine {
                    machine,
                    state: id.name().to_string(),
                    mode,
                }
            }
        }));
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Flatten a validation into the violations it carries.
pub fn violations(validation: ConfigValidation) -> Vec<ConfigViolation> {
    match validation {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
