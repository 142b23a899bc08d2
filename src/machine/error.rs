//! Machine error types.

use crate::validation::ConfigViolation;
use thiserror::Error;

/// Contract violations reported by [`Fsm`](super::Fsm) operations.
///
/// When an operation returns an error, no state callback has run and the
/// machine is left as it was. The exceptions are `activate`, which retires a
/// misconfigured machine for good, and
/// [`resume_transitions`](super::Fsm::resume_transitions), which replays the
/// rest of the queue before reporting the first command that failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FsmError {
    #[error("Machine structure is frozen once activated")]
    AlreadyActive,

    #[error("Machine is not active")]
    NotActive,

    #[error("Machine refused activation and cannot be used")]
    ActivationRefused,

    #[error("State '{0}' is already registered")]
    DuplicateState(String),

    #[error("State id {0} is reserved for 'no state'")]
    ReservedStateId(i8),

    #[error("State '{0}' is not registered")]
    UnknownState(String),

    #[error("Starting state already set to '{0}'")]
    StartingStateAlreadySet(String),

    #[error("Only the authority may transition a synchronized machine")]
    NotAuthority,

    #[error("Cannot end state '{0}': no validly entered local state")]
    NoValidState(String),

    #[error("Transitions are already suspended")]
    AlreadySuspended,

    #[error("Transitions are not suspended")]
    NotSuspended,

    #[error("Message addressed to machine {found}, this is {expected}")]
    WrongMachine { expected: String, found: String },

    #[error("Initial replication requires a replicated machine")]
    NotReplicated,

    #[error("Invalid configuration: {}", format_violations(.0))]
    InvalidConfiguration(Vec<ConfigViolation>),
}

fn format_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
