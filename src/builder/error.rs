//! Build errors for the machine builder.

use crate::machine::FsmError;
use crate::validation::ConfigViolation;
use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Starting state not specified. Call .starting_state(id) before .build()")]
    MissingStartingState,

    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error("Registration failed: {0}")]
    Registration(#[from] FsmError),

    #[error("Machine would not activate: {0:?}")]
    Invalid(Vec<ConfigViolation>),
}
